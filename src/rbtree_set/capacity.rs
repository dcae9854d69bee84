use super::RBTreeSet;
use crate::RBTreeMap;

impl<T> RBTreeSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds [`RBTreeSet::max_capacity`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity(capacity),
        }
    }

    /// Returns the current capacity for the set.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(32);
    /// assert!(set.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the maximum number of elements the set can ever hold.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::new();
    /// assert!(set.max_capacity() >= u32::MAX as usize - 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn max_capacity(&self) -> usize {
        self.map.max_capacity()
    }
}
