use core::cmp::Ordering;

/// Ordering policy held by the tree as constructor state.
///
/// The tree never requires `T: Ord` itself; every structural decision goes
/// through the policy instance the tree was built with. Adapters supply the
/// policy: the map orders its `(K, V)` entries by key via [`KeyOrder`].
/// Borrowed-key lookups descend with a closure instead (see
/// [`RawRBTree::find_by`](super::RawRBTree::find_by)); the closure's ordering
/// must agree with the policy's, which the standard `Borrow` contract
/// already demands of the adapters' `Q: Ord` query types.
pub(crate) trait Compare<T> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

/// Orders key-value entries by key alone; the mapped value never
/// participates in comparisons.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct KeyOrder;

impl<K: Ord, V> Compare<(K, V)> for KeyOrder {
    #[inline]
    fn compare(&self, lhs: &(K, V), rhs: &(K, V)) -> Ordering {
        lhs.0.cmp(&rhs.0)
    }
}
