use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

/// A last-in-first-out stack backed by a growable array.
///
/// `Stack` restricts a [`Vec`] to the three stack operations: [`push`] onto
/// the top, [`pop`] off the top, and [`peek`] at the top. Elements below the
/// top stay inaccessible until everything above them has been popped.
///
/// Comparisons ([`PartialEq`], [`Ord`], ...) and iteration visit the
/// elements from the bottom of the stack to the top, the order in which they
/// were pushed. Use [`Iterator::rev`] to traverse in pop order.
///
/// [`push`]: Stack::push
/// [`pop`]: Stack::pop
/// [`peek`]: Stack::peek
///
/// # Examples
///
/// ```
/// use rbtree_arena::Stack;
///
/// let mut stack = Stack::new();
///
/// stack.push(1);
/// stack.push(2);
/// stack.push(3);
///
/// assert_eq!(stack.peek(), Some(&3));
/// assert_eq!(stack.pop(), Some(3));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.len(), 1);
/// ```
pub struct Stack<T> {
    items: Vec<T>,
}

/// An iterator over the elements of a `Stack`, bottom of the stack first.
///
/// This `struct` is created by the [`iter`] method on [`Stack`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::Stack;
///
/// let stack = Stack::from(vec![1, 2, 3]);
/// let mut iter = stack.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// ```
///
/// [`iter`]: Stack::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: core::slice::Iter<'a, T>,
}

/// A mutable iterator over the elements of a `Stack`, bottom of the stack
/// first.
///
/// This `struct` is created by the [`iter_mut`] method on [`Stack`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::Stack;
///
/// let mut stack = Stack::from(vec![1, 2, 3]);
/// for item in stack.iter_mut() {
///     *item *= 10;
/// }
/// assert_eq!(stack.pop(), Some(30));
/// ```
///
/// [`iter_mut`]: Stack::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T: 'a> {
    inner: core::slice::IterMut<'a, T>,
}

/// An owning iterator over the elements of a `Stack`, bottom of the stack
/// first.
///
/// This `struct` is created by the [`into_iter`] method on [`Stack`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::Stack;
///
/// let stack = Stack::from(vec![1, 2, 3]);
/// let mut iter = stack.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// ```
///
/// [`into_iter`]: Stack#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> Stack<T> {
    /// Makes a new, empty `Stack`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    ///
    /// // elements can now be pushed onto the empty stack
    /// stack.push(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> Stack<T> {
        Stack {
            items: Vec::new(),
        }
    }

    /// Creates an empty stack with capacity for at least `capacity`
    /// elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let stack: Stack<i32> = Stack::with_capacity(16);
    /// assert!(stack.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Stack<T> {
        Stack {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Returns the current capacity for the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let stack: Stack<i32> = Stack::with_capacity(32);
    /// assert!(stack.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns the number of elements in the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// assert_eq!(stack.len(), 0);
    /// stack.push(1);
    /// assert_eq!(stack.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the stack contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// assert!(stack.is_empty());
    /// stack.push(1);
    /// assert!(!stack.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes an element onto the top of the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(1);
    /// stack.push(2);
    /// assert_eq!(stack.peek(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) amortized.
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes the top element from the stack and returns it, or `None` if
    /// the stack is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(1);
    /// stack.push(2);
    /// assert_eq!(stack.pop(), Some(2));
    /// assert_eq!(stack.pop(), Some(1));
    /// assert_eq!(stack.pop(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns a reference to the top element of the stack, or `None` if
    /// the stack is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// assert_eq!(stack.peek(), None);
    /// stack.push(1);
    /// assert_eq!(stack.peek(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns a mutable reference to the top element of the stack, or
    /// `None` if the stack is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(1);
    /// if let Some(top) = stack.peek_mut() {
    ///     *top = 5;
    /// }
    /// assert_eq!(stack.pop(), Some(5));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Clears the stack, removing all elements. Allocated capacity is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push(1);
    /// stack.clear();
    /// assert!(stack.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to drop the elements.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Gets an iterator over the elements of the stack, bottom of the stack
    /// first.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let stack = Stack::from(vec![1, 2, 3]);
    /// let collected: Vec<_> = stack.iter().copied().collect();
    /// assert_eq!(collected, [1, 2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; each step is O(1).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.items.iter(),
        }
    }

    /// Gets a mutable iterator over the elements of the stack, bottom of
    /// the stack first.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::from(vec![1, 2, 3]);
    /// for item in stack.iter_mut() {
    ///     *item += 10;
    /// }
    /// assert_eq!(stack.pop(), Some(13));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; each step is O(1).
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.items.iter_mut(),
        }
    }
}

impl<T: Clone> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Stack {
            items: self.items.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Stack::new()
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Stack<T>) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: PartialOrd> PartialOrd for Stack<T> {
    fn partial_cmp(&self, other: &Stack<T>) -> Option<Ordering> {
        self.items.partial_cmp(&other.items)
    }
}

impl<T: Ord> Ord for Stack<T> {
    fn cmp(&self, other: &Stack<T>) -> Ordering {
        self.items.cmp(&other.items)
    }
}

impl<T: Hash> Hash for Stack<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl<T> FromIterator<T> for Stack<T> {
    /// Builds a stack from an iterator, pushing the items in iteration
    /// order. The last item ends up on top.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack: Stack<i32> = (1..=3).collect();
    /// assert_eq!(stack.pop(), Some(3));
    /// ```
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Stack {
            items: Vec::from_iter(iter),
        }
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> From<Vec<T>> for Stack<T> {
    /// Converts a `Vec<T>` into a `Stack<T>`, keeping the allocation. The
    /// last element of the vector ends up on top.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let mut stack = Stack::from(vec![1, 2, 3]);
    /// assert_eq!(stack.pop(), Some(3));
    /// ```
    fn from(items: Vec<T>) -> Self {
        Stack {
            items,
        }
    }
}

impl<T> IntoIterator for Stack<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `Stack`'s contents, bottom of
    /// the stack first.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::Stack;
    ///
    /// let stack = Stack::from(vec![1, 2, 3]);
    ///
    /// let v: Vec<_> = stack.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.items.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Stack<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("inner", &self.inner).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `stack::Iter`.
    ///
    /// ```
    /// # use rbtree_arena::stack;
    /// let iter: stack::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            inner: (&[]).iter(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("inner", &self.inner).finish()
    }
}

impl<T> Default for IterMut<'_, T> {
    /// Creates an empty `stack::IterMut`.
    ///
    /// ```
    /// # use rbtree_arena::stack;
    /// let iter: stack::IterMut<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            inner: (&mut []).iter_mut(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: Clone> Clone for IntoIter<T> {
    fn clone(&self) -> Self {
        IntoIter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("inner", &self.inner).finish()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `stack::IntoIter`.
    ///
    /// ```
    /// # use rbtree_arena::stack;
    /// let iter: stack::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: Vec::new().into_iter(),
        }
    }
}
