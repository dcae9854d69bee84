use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Bound, Index, RangeBounds};

use smallvec::SmallVec;

use crate::raw::{Handle, KeyOrder, RawRBTree};

mod capacity;
mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// Validates that the start bound does not exceed the end bound.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<T, R>(range: &R)
where
    T: ?Sized + Ord,
    R: RangeBounds<T>,
{
    if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
        (range.start_bound(), range.end_bound())
    {
        let valid =
            if matches!(range.start_bound(), Bound::Excluded(_)) && matches!(range.end_bound(), Bound::Excluded(_)) {
                start < end
            } else {
                start <= end
            };
        assert!(valid, "range start is greater than range end in RBTreeMap");
    }
}

/// An ordered map based on a [red-black tree].
///
/// Given a key type with a [total order], an ordered map stores its entries in
/// key order. That means that keys must be of a type that implements the
/// [`Ord`] trait, such that two keys can always be compared to determine their
/// [`Ordering`]. Examples of keys with a total order are strings with
/// lexicographical order, and numbers with their natural order.
///
/// Iterators obtained from functions such as [`RBTreeMap::iter`],
/// [`RBTreeMap::into_iter`], [`RBTreeMap::values`], or [`RBTreeMap::keys`]
/// produce their items in key order, and take worst-case logarithmic and
/// amortized constant time per item returned.
///
/// Unlike the standard library's `BTreeMap`, inserting a key that is already
/// present does **not** replace the stored entry: the new pair is dropped and
/// [`insert`](RBTreeMap::insert) reports `false`. Use the [`Entry`] API or
/// [`get_mut`](RBTreeMap::get_mut) to update a value in place.
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the map. This is normally only possible through
/// [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The behavior
/// resulting from such a logic error is not specified, but will be
/// encapsulated to the `RBTreeMap` that observed the logic error and not
/// result in undefined behavior. This could include panics, incorrect
/// results, aborts, memory leaks, and non-termination.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `RBTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = RBTreeMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert("The Godfather", "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Misérables") {
///     println!(
///         "We've got {} reviews, but Les Misérables ain't one.",
///         movie_reviews.len()
///     );
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///         Some(review) => println!("{movie}: {review}"),
///         None => println!("{movie} is unreviewed."),
///     }
/// }
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// # Implementation
///
/// A classic pointer-based red-black tree allocates every node separately, so
/// each step of a search is a fresh heap object and a potential cache miss.
/// This map keeps the red-black balancing discipline but stores all nodes in
/// a single growable arena, linked by plain indices: the whole tree is two
/// allocations (links and elements), clearing is O(1), and cloning is a flat
/// copy of the arenas rather than a node-by-node rebuild.
///
/// The balancing discipline itself is the textbook one: every node is red or
/// black, the root is black, a red node never has a red child, and every path
/// from the root to a missing child crosses the same number of black nodes.
/// Together these bound the tree height by 2·log₂(n + 1), which makes every
/// search, insertion, and removal O(log n) worst case.
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct RBTreeMap<K, V> {
    raw: RawRBTree<(K, V), KeyOrder>,
}

/// An iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: *const RawRBTree<(K, V), KeyOrder>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a RawRBTree<(K, V), KeyOrder>>,
}

// SAFETY: Iter behaves as &RawRBTree, so it is Send/Sync when the tree is Sync.
unsafe impl<K: Sync, V: Sync> Send for Iter<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, 10), (2, 20)]);
/// for (_, value) in map.iter_mut() {
///     *value += 1;
/// }
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, [11, 21]);
/// ```
///
/// [`iter_mut`]: RBTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    tree: *mut RawRBTree<(K, V), KeyOrder>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a mut (K, V)>,
}

// SAFETY: IterMut behaves as &mut RawRBTree, so it is Send when K and V are Send.
// It is NOT Sync because mutable iterators should not be shared across threads.
unsafe impl<K: Send, V: Send> Send for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next(), Some((1, "a")));
/// assert_eq!(iter.next_back(), Some((2, "b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 2]);
/// ```
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, ["a", "b"]);
/// ```
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`RBTreeMap`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, 10), (2, 20)]);
/// for value in map.values_mut() {
///     *value *= 2;
/// }
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, [20, 40]);
/// ```
///
/// [`values_mut`]: RBTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

// SAFETY: ValuesMut behaves as &mut RawRBTree, so it is Send when K and V are Send.
unsafe impl<K: Send, V: Send> Send for ValuesMut<'_, K, V> {}

/// An owning iterator over the keys of a `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let keys: Vec<_> = map.into_keys().collect();
/// assert_eq!(keys, [1, 2]);
/// ```
///
/// [`into_keys`]: RBTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of a `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_values`] method on [`RBTreeMap`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let values: Vec<_> = map.into_values().collect();
/// assert_eq!(values, ["a", "b"]);
/// ```
///
/// [`into_values`]: RBTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

/// An iterator over a sub-range of entries in a `RBTreeMap`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let entries: Vec<_> = map.range(2..).collect();
/// assert_eq!(entries, [(&2, &"b"), (&3, &"c")]);
/// ```
///
/// [`range`]: RBTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K: 'a, V: 'a> {
    tree: *const RawRBTree<(K, V), KeyOrder>,
    front: Option<Handle>,
    back: Option<Handle>,
    /// Tracks whether the iterator has been exhausted (front and back have crossed).
    finished: bool,
    _marker: PhantomData<&'a RawRBTree<(K, V), KeyOrder>>,
}

// SAFETY: Range behaves as &RawRBTree, so it is Send/Sync when the tree is Sync.
unsafe impl<K: Sync, V: Sync> Send for Range<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Range<'_, K, V> {}

/// A mutable iterator over a sub-range of entries in a `RBTreeMap`.
///
/// This `struct` is created by the [`range_mut`] method on [`RBTreeMap`]. See
/// its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_arena::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, 10), (2, 20), (3, 30)]);
/// for (_, value) in map.range_mut(2..=3) {
///     *value += 1;
/// }
/// assert_eq!(map.get(&1), Some(&10));
/// assert_eq!(map.get(&2), Some(&21));
/// assert_eq!(map.get(&3), Some(&31));
/// ```
///
/// [`range_mut`]: RBTreeMap::range_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RangeMut<'a, K: 'a, V: 'a> {
    tree: *mut RawRBTree<(K, V), KeyOrder>,
    front: Option<Handle>,
    back: Option<Handle>,
    /// Tracks whether the iterator has been exhausted (front and back have crossed).
    finished: bool,
    _marker: PhantomData<&'a mut (K, V)>,
}

// SAFETY: RangeMut behaves as &mut RawRBTree, so it is Send when K and V are Send.
// It is NOT Sync because mutable iterators should not be shared across threads.
unsafe impl<K: Send, V: Send> Send for RangeMut<'_, K, V> {}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> RBTreeMap<K, V> {
        RBTreeMap {
            raw: RawRBTree::new(KeyOrder),
        }
    }

    /// Clears the map, removing all elements. Allocated capacity is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to drop the elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find_by(|entry| key.cmp(entry.0.borrow()))?;
        Some(&self.raw.value(handle).1)
    }

    /// Returns the key-value pair corresponding to the supplied key. This is
    /// potentially useful:
    /// - for key types where non-identical keys can be considered equal;
    /// - for getting the `&K` stored key value from a borrowed `&Q` lookup key; or
    /// - for getting a reference to a key with the same lifetime as the collection.
    ///
    /// The supplied key may be any borrowed form of the map's key type, but
    /// the ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find_by(|entry| key.cmp(entry.0.borrow()))?;
        let entry = self.raw.value(handle);
        Some((&entry.0, &entry.1))
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.raw.first()?;
        let entry = self.raw.value(handle);
        Some((&entry.0, &entry.1))
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// Draining elements in ascending order, while keeping a usable map each
    /// iteration.
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.raw.first()?;
        Some(self.raw.erase_at(handle))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.raw.last()?;
        let entry = self.raw.value(handle);
        Some((&entry.0, &entry.1))
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    ///
    /// # Examples
    ///
    /// Draining elements in descending order, while keeping a usable map each
    /// iteration.
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_last() {
    ///     assert!(map.iter().all(|(k, _v)| *k < key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.raw.last()?;
        Some(self.raw.erase_at(handle))
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.find_by(|entry| key.cmp(entry.0.borrow())).is_some()
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find_by(|entry| key.cmp(entry.0.borrow()))?;
        Some(&mut self.raw.value_mut(handle).1)
    }

    /// Inserts a key-value pair into the map and returns `true`, unless the
    /// key is already present.
    ///
    /// If the map already has this key, nothing changes: the stored key and
    /// value are kept, the supplied pair is dropped, and `false` is returned.
    /// Use the [`Entry`] API or [`get_mut`](Self::get_mut) to overwrite an
    /// existing value. This differs from the standard library's `BTreeMap`,
    /// which replaces the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), true);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// assert_eq!(map.insert(37, "b"), false);
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn insert(&mut self, key: K, value: V) -> bool
    where
        K: Ord,
    {
        let (_, inserted) = self.raw.insert((key, value));
        inserted
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find_by(|entry| key.cmp(entry.0.borrow()))?;
        Some(self.raw.erase_at(handle))
    }

    /// Removes every entry whose key lies in `range`, returning how many were
    /// removed.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// assert_eq!(map.remove_range(2..5), 3);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [0, 1, 5, 6, 7]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log n) for k removed entries.
    pub fn remove_range<T, R>(&mut self, range: R) -> usize
    where
        T: ?Sized + Ord,
        K: Borrow<T> + Ord,
        R: RangeBounds<T>,
    {
        validate_range_bounds(&range);

        let from = match range.start_bound() {
            Bound::Unbounded => self.raw.first(),
            Bound::Included(start) => self.raw.lower_bound_by(|entry| start.cmp(entry.0.borrow())),
            Bound::Excluded(start) => self.raw.upper_bound_by(|entry| start.cmp(entry.0.borrow())),
        };
        let to = match range.end_bound() {
            Bound::Unbounded => None,
            Bound::Included(end) => self.raw.upper_bound_by(|entry| end.cmp(entry.0.borrow())),
            Bound::Excluded(end) => self.raw.lower_bound_by(|entry| end.cmp(entry.0.borrow())),
        };
        self.raw.erase_range(from, to)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)`
    /// returns `false`. The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) in the worst case (when many elements are removed).
    pub fn retain<F>(&mut self, mut f: F)
    where
        K: Ord,
        F: FnMut(&K, &mut V) -> bool,
    {
        // The predicate runs over a fully linked tree; removals happen after
        // the walk. Rejected nodes keep their handles until then.
        let mut condemned: SmallVec<[Handle; 16]> = SmallVec::new();
        let mut cursor = self.raw.first();
        while let Some(handle) = cursor {
            cursor = self.raw.successor(handle);
            let entry = self.raw.value_mut(handle);
            if !f(&entry.0, &mut entry.1) {
                condemned.push(handle);
            }
        }
        for handle in condemned {
            self.raw.erase_at(handle);
        }
    }

    /// Moves all elements from `other` into `self`, leaving `other` empty.
    ///
    /// If a key from `other` is already present in `self`, the element
    /// already in `self` is kept and the one from `other` is dropped. This
    /// differs from the standard library's `BTreeMap`, which keeps the value
    /// from `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "a");
    /// a.insert(2, "b");
    /// a.insert(3, "c"); // Note: Key (3) also present in b.
    ///
    /// let mut b = RBTreeMap::new();
    /// b.insert(3, "d"); // Note: Key (3) also present in a.
    /// b.insert(4, "e");
    /// b.insert(5, "f");
    ///
    /// a.append(&mut b);
    ///
    /// assert_eq!(a.len(), 5);
    /// assert_eq!(b.len(), 0);
    ///
    /// assert_eq!(a[&1], "a");
    /// assert_eq!(a[&2], "b");
    /// assert_eq!(a[&3], "c"); // Note: "c", not "d".
    /// assert_eq!(a[&4], "e");
    /// assert_eq!(a[&5], "f");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)) where m is the size of `other`.
    pub fn append(&mut self, other: &mut Self)
    where
        K: Ord,
    {
        for entry in other.raw.drain_to_vec() {
            self.raw.insert(entry);
        }
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the
    /// map. The simplest way is to use the range syntax `min..max`, thus
    /// `range(min..max)` will yield elements from min (inclusive) to max
    /// (exclusive). The range may also be entered as `(Bound<T>, Bound<T>)`,
    /// so for example `range((Excluded(4), Included(10)))` will yield a
    /// left-exclusive, right-inclusive range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::Bound::Included;
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "a");
    /// map.insert(5, "b");
    /// map.insert(8, "c");
    /// for (&key, &value) in map.range((Included(&4), Included(&8))) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(Some((&5, &"b")), map.range(4..).next());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn range<T, R>(&self, range: R) -> Range<'_, K, V>
    where
        T: ?Sized + Ord,
        K: Borrow<T> + Ord,
        R: RangeBounds<T>,
    {
        let (front, back) = self.range_handles(&range);
        Range {
            tree: &raw const self.raw,
            front,
            back,
            finished: front.is_none(),
            _marker: PhantomData,
        }
    }

    /// Constructs a mutable double-ended iterator over a sub-range of
    /// elements in the map. The simplest way is to use the range syntax
    /// `min..max`, thus `range_mut(min..max)` will yield elements from min
    /// (inclusive) to max (exclusive). The range may also be entered as
    /// `(Bound<T>, Bound<T>)`, so for example
    /// `range_mut((Excluded(4), Included(10)))` will yield a left-exclusive,
    /// right-inclusive range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, i32> =
    ///     [("Alice", 0), ("Bob", 0), ("Carol", 0), ("Cheryl", 0)].into();
    /// for (_, balance) in map.range_mut("B".."Cheryl") {
    ///     *balance += 100;
    /// }
    /// for (name, balance) in &map {
    ///     println!("{name} => {balance}");
    /// }
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn range_mut<T, R>(&mut self, range: R) -> RangeMut<'_, K, V>
    where
        T: ?Sized + Ord,
        K: Borrow<T> + Ord,
        R: RangeBounds<T>,
    {
        let (front, back) = self.range_handles(&range);
        RangeMut {
            tree: &raw mut self.raw,
            front,
            back,
            finished: front.is_none(),
            _marker: PhantomData,
        }
    }

    /// Resolves `range` to its first and last contained positions, or
    /// `(None, None)` when no element falls inside it.
    fn range_handles<T, R>(&self, range: &R) -> (Option<Handle>, Option<Handle>)
    where
        T: ?Sized + Ord,
        K: Borrow<T> + Ord,
        R: RangeBounds<T>,
    {
        validate_range_bounds(range);

        let front = match range.start_bound() {
            Bound::Unbounded => self.raw.first(),
            Bound::Included(start) => self.raw.lower_bound_by(|entry| start.cmp(entry.0.borrow())),
            Bound::Excluded(start) => self.raw.upper_bound_by(|entry| start.cmp(entry.0.borrow())),
        };
        let back = match range.end_bound() {
            Bound::Unbounded => self.raw.last(),
            Bound::Included(end) => match self.raw.upper_bound_by(|entry| end.cmp(entry.0.borrow())) {
                Some(after) => self.raw.predecessor(after),
                None => self.raw.last(),
            },
            Bound::Excluded(end) => match self.raw.lower_bound_by(|entry| end.cmp(entry.0.borrow())) {
                Some(after) => self.raw.predecessor(after),
                None => self.raw.last(),
            },
        };

        // The resolved ends cross when nothing falls inside the range.
        match (front, back) {
            (Some(front_handle), Some(back_handle)) => {
                if self.raw.value(front_handle).0 > self.raw.value(back_handle).0 {
                    (None, None)
                } else {
                    (front, back)
                }
            }
            _ => (None, None),
        }
    }

    /// Constructs a double-ended iterator over the entries whose keys compare
    /// equal to `key`. Keys in the map are unique, so it yields at most one
    /// entry, but the iterator form keeps both bracketing positions from the
    /// same pair of searches.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.equal_range(&2).next(), Some((&2, &"b")));
    /// assert_eq!(map.equal_range(&3).next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn equal_range<T>(&self, key: &T) -> Range<'_, K, V>
    where
        T: ?Sized + Ord,
        K: Borrow<T> + Ord,
    {
        let (lower, upper) = self.raw.equal_range_by(|entry| key.cmp(entry.0.borrow()));
        if lower == upper {
            // Identical bounds bracket an empty run.
            return Range {
                tree: &raw const self.raw,
                front: None,
                back: None,
                finished: true,
                _marker: PhantomData,
            };
        }
        let back = match upper {
            Some(after) => self.raw.predecessor(after),
            None => self.raw.last(),
        };
        Range {
            tree: &raw const self.raw,
            front: lower,
            back,
            finished: false,
            _marker: PhantomData,
        }
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut count: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     *count.entry(x).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V>
    where
        K: Ord,
    {
        match self.raw.find_by(|entry| key.cmp(&entry.0)) {
            Some(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree: &mut self.raw,
            }),
            None => Entry::Vacant(VacantEntry {
                key,
                tree: &mut self.raw,
            }),
        }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this. The iterator element type
    /// is `K`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this. The iterator element type
    /// is `V`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.into_values().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: &raw const self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
            _marker: PhantomData,
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map["a"], 1);
    /// assert_eq!(map["b"], 12);
    /// assert_eq!(map["c"], 13);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
            tree: &raw mut self.raw,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let keys: Vec<_> = map.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "hello");
    /// map.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = map.values().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, String::from("hello"));
    /// map.insert(2, String::from("goodbye"));
    ///
    /// for value in map.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = map.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"), String::from("goodbye!")]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is O(1) amortized.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<K: Clone, V: Clone> Clone for RBTreeMap<K, V> {
    fn clone(&self) -> Self {
        RBTreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for RBTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RBTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RBTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for RBTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for RBTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RBTreeMap<K, V> {
    fn default() -> Self {
        RBTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTreeMap<K, V> {
    /// Builds a map from the pairs, keeping the **first** occurrence of each
    /// key.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RBTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RBTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RBTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for RBTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        let entries = self.raw.drain_to_vec();
        IntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for RBTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RBTreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a `RBTreeMap<K, V>`. On duplicate keys,
    /// the first pair wins.
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map1 = RBTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: RBTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;

        // SAFETY: When remaining > 0, self.tree is a valid pointer obtained
        // from a live reference in iter(), and handle names one of its nodes.
        let entry = unsafe { RawRBTree::value_ptr(self.tree, handle) };
        // SAFETY: Same pointer; stepping reads only node links.
        self.front = unsafe { RawRBTree::successor_ptr(self.tree, handle) };
        self.remaining -= 1;

        Some((&entry.0, &entry.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;

        // SAFETY: When remaining > 0, self.tree is a valid pointer obtained
        // from a live reference in iter(), and handle names one of its nodes.
        let entry = unsafe { RawRBTree::value_ptr(self.tree, handle) };
        // SAFETY: Same pointer; stepping reads only node links.
        self.back = unsafe { RawRBTree::predecessor_ptr(self.tree, handle) };
        self.remaining -= 1;

        Some((&entry.0, &entry.1))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K: 'a, V: 'a> Default for Iter<'a, K, V> {
    /// Creates an empty `rbtree_map::Iter`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            // SAFETY: tree is never dereferenced when remaining == 0 and
            // front/back are None, so a dangling pointer is safe here.
            tree: core::ptr::NonNull::dangling().as_ptr(),
            front: None,
            back: None,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.front?;

        // SAFETY: We have exclusive access to the tree through the raw
        // pointer, each handle is yielded at most once, and node links live
        // apart from the elements, so stepping never touches a pair this
        // iterator has already handed out.
        let entry = unsafe { RawRBTree::value_mut_ptr(self.tree, handle) };
        // SAFETY: Same pointer; stepping reads only node links.
        self.front = unsafe { RawRBTree::successor_ptr(self.tree, handle) };
        self.remaining -= 1;

        Some((&entry.0, &mut entry.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let handle = self.back?;

        // SAFETY: We have exclusive access to the tree through the raw
        // pointer, each handle is yielded at most once, and node links live
        // apart from the elements, so stepping never touches a pair this
        // iterator has already handed out.
        let entry = unsafe { RawRBTree::value_mut_ptr(self.tree, handle) };
        // SAFETY: Same pointer; stepping reads only node links.
        self.back = unsafe { RawRBTree::predecessor_ptr(self.tree, handle) };
        self.remaining -= 1;

        Some((&entry.0, &mut entry.1))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K: 'a, V: 'a> Default for IterMut<'a, K, V> {
    /// Creates an empty `rbtree_map::IterMut`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::IterMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            // SAFETY: tree is never dereferenced when remaining == 0 and
            // front/back are None, so a dangling pointer is safe here.
            tree: core::ptr::NonNull::dangling().as_ptr(),
            front: None,
            back: None,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("len", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `rbtree_map::IntoIter`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::IntoIter<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    /// Creates an empty `rbtree_map::Keys`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::Keys<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Keys {
            inner: Iter::default(),
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for Values<'_, K, V> {
    /// Creates an empty `rbtree_map::Values`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::Values<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Values {
            inner: Iter::default(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values").field("remaining", &self.inner.remaining).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Default for ValuesMut<'_, K, V> {
    /// Creates an empty `rbtree_map::ValuesMut`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::ValuesMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        ValuesMut {
            inner: IterMut::default(),
        }
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoKeys").field("len", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IntoKeys<K, V> {
    /// Creates an empty `rbtree_map::IntoKeys`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::IntoKeys<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoKeys {
            inner: IntoIter::default(),
        }
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoValues").field("len", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IntoValues<K, V> {
    /// Creates an empty `rbtree_map::IntoValues`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::IntoValues<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoValues {
            inner: IntoIter::default(),
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let handle = self.front?;

        // SAFETY: The pointer came from a live reference in range(), and the
        // resolved front/back handles name nodes of that tree.
        let entry = unsafe { RawRBTree::value_ptr(self.tree, handle) };
        if self.front == self.back {
            self.finished = true;
        } else {
            // SAFETY: Same pointer; stepping reads only node links.
            self.front = unsafe { RawRBTree::successor_ptr(self.tree, handle) };
        }

        Some((&entry.0, &entry.1))
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let handle = self.back?;

        // SAFETY: The pointer came from a live reference in range(), and the
        // resolved front/back handles name nodes of that tree.
        let entry = unsafe { RawRBTree::value_ptr(self.tree, handle) };
        if self.front == self.back {
            self.finished = true;
        } else {
            // SAFETY: Same pointer; stepping reads only node links.
            self.back = unsafe { RawRBTree::predecessor_ptr(self.tree, handle) };
        }

        Some((&entry.0, &entry.1))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range").field("finished", &self.finished).finish()
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            front: self.front,
            back: self.back,
            finished: self.finished,
            _marker: PhantomData,
        }
    }
}

impl<'a, K, V> Default for Range<'a, K, V> {
    /// Creates an empty `rbtree_map::Range`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::Range<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.count(), 0);
    /// ```
    fn default() -> Self {
        Range {
            // SAFETY: tree is never dereferenced when finished is set and
            // front/back are None, so a dangling pointer is safe here.
            tree: core::ptr::NonNull::dangling().as_ptr(),
            front: None,
            back: None,
            finished: true,
            _marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let handle = self.front?;

        // SAFETY: We have exclusive access to the tree through the raw
        // pointer and each handle between front and back is yielded at most
        // once; stepping reads only node links.
        let entry = unsafe { RawRBTree::value_mut_ptr(self.tree, handle) };
        if self.front == self.back {
            self.finished = true;
        } else {
            // SAFETY: Same pointer; stepping reads only node links.
            self.front = unsafe { RawRBTree::successor_ptr(self.tree, handle) };
        }

        Some((&entry.0, &mut entry.1))
    }
}

impl<K, V> DoubleEndedIterator for RangeMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let handle = self.back?;

        // SAFETY: We have exclusive access to the tree through the raw
        // pointer and each handle between front and back is yielded at most
        // once; stepping reads only node links.
        let entry = unsafe { RawRBTree::value_mut_ptr(self.tree, handle) };
        if self.front == self.back {
            self.finished = true;
        } else {
            // SAFETY: Same pointer; stepping reads only node links.
            self.back = unsafe { RawRBTree::predecessor_ptr(self.tree, handle) };
        }

        Some((&entry.0, &mut entry.1))
    }
}

impl<K, V> FusedIterator for RangeMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RangeMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeMut").field("finished", &self.finished).finish()
    }
}

impl<'a, K, V> Default for RangeMut<'a, K, V> {
    /// Creates an empty `rbtree_map::RangeMut`.
    ///
    /// ```
    /// # use rbtree_arena::rbtree_map;
    /// let iter: rbtree_map::RangeMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.count(), 0);
    /// ```
    fn default() -> Self {
        RangeMut {
            // SAFETY: tree is never dereferenced when finished is set and
            // front/back are None, so a dangling pointer is safe here.
            tree: core::ptr::NonNull::dangling().as_ptr(),
            front: None,
            back: None,
            finished: true,
            _marker: PhantomData,
        }
    }
}
