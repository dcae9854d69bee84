use super::RBTreeMap;
use crate::raw::{KeyOrder, RawRBTree};

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` with at least the specified capacity.
    ///
    /// The map will be able to hold at least `capacity` elements without
    /// reallocating its arenas.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`max_capacity`](Self::max_capacity).
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_capacity(32);
    /// map.insert(1, "a");
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> RBTreeMap<K, V> {
        RBTreeMap {
            raw: RawRBTree::with_capacity(capacity, KeyOrder),
        }
    }

    /// Returns the number of elements the map can hold without reallocating.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the largest number of elements any `RBTreeMap` can hold.
    ///
    /// The limit comes from the index type used to link nodes, not from
    /// available memory.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_arena::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::new();
    /// assert!(map.max_capacity() >= u32::MAX as usize - 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn max_capacity(&self) -> usize {
        RawRBTree::<(K, V), KeyOrder>::max_capacity()
    }
}
