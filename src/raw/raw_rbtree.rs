use alloc::vec::Vec;
use core::cmp::Ordering;

use super::arena::Arena;
use super::compare::Compare;
use super::handle::Handle;
use super::node::{Color, Node, Side};

/// The core red-black tree backing [`RBTreeMap`](crate::rbtree_map::RBTreeMap)
/// and, through it, [`RBTreeSet`](crate::rbtree_set::RBTreeSet).
///
/// Elements live in an arena and link to each other by [`Handle`], so the tree
/// is a single pair of growable allocations rather than one allocation per
/// node. Ordering is a property of the tree itself: the comparator `C` is
/// fixed at construction and consulted for every insertion, and lookups take a
/// caller-built probe closure so they can compare against borrowed forms of
/// the element.
///
/// Elements are unique under `C`; inserting an equal element is a no-op.
pub(crate) struct RawRBTree<T, C> {
    /// Arena storing the tree structure: colors and parent/child links.
    nodes: Arena<Node>,
    /// Arena storing the elements, separate from the links so that handing
    /// out `&mut T` never touches node storage.
    values: Arena<T>,
    /// Handle of the root node, [`None`] when the tree is empty.
    root: Option<Handle>,
    /// Number of elements currently stored.
    len: usize,
    /// Ordering policy consulted on every insertion.
    cmp: C,
}

impl<T, C> RawRBTree<T, C> {
    /// Creates an empty tree ordered by `cmp`.
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Creates an empty tree with room for `capacity` elements before the
    /// arenas reallocate.
    pub(crate) fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Returns how many elements can be stored without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Most elements any tree can hold, bounded by the handle width. The
    /// arenas refuse to grow past [`Handle::MAX`] live slots.
    pub(crate) const fn max_capacity() -> usize {
        Handle::MAX
    }

    /// Returns the number of elements in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every element. Allocated capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Empties the tree and returns the elements in order. The arenas are
    /// reset wholesale instead of unlinking node by node.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut drained = Vec::with_capacity(self.len);
        let mut cursor = self.first();
        while let Some(handle) = cursor {
            cursor = self.successor(handle);
            let slot = self.node(handle).value_handle();
            drained.push(self.values.take(slot));
        }
        self.clear();
        drained
    }

    fn node(&self, handle: Handle) -> &Node {
        self.nodes.get(handle)
    }

    fn node_mut(&mut self, handle: Handle) -> &mut Node {
        self.nodes.get_mut(handle)
    }

    /// Borrows the element stored at node `handle`.
    pub(crate) fn value(&self, handle: Handle) -> &T {
        self.values.get(self.node(handle).value_handle())
    }

    /// Mutably borrows the element stored at node `handle`.
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut T {
        let slot = self.node(handle).value_handle();
        self.values.get_mut(slot)
    }

    /// Borrows the element at node `handle` for a caller-chosen lifetime.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a live tree, and `handle` must keep naming one
    ///   of its nodes for the whole of `'a`.
    pub(crate) unsafe fn value_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a T {
        // SAFETY: Both reads project fields of the tree the caller vouches
        // for; `nodes` and `values` are disjoint.
        unsafe {
            let slot = Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle).value_handle();
            Arena::get_ptr(core::ptr::addr_of!((*ptr).values), slot)
        }
    }

    /// Mutably borrows the element at node `handle` for a caller-chosen
    /// lifetime.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a live tree, `handle` must keep naming one of
    ///   its nodes for the whole of `'a`, and no other borrow of that element
    ///   may exist during `'a`.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        // SAFETY: The node link is read through `nodes` and the element
        // borrowed through `values`; the two fields never alias, so this
        // cannot disturb other element borrows.
        unsafe {
            let slot = Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle).value_handle();
            Arena::get_mut_ptr(core::ptr::addr_of_mut!((*ptr).values), slot)
        }
    }

    /// Handle of the smallest element, [`None`] when empty.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| Self::min_in(&self.nodes, root))
    }

    /// Handle of the largest element, [`None`] when empty.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| Self::max_in(&self.nodes, root))
    }

    /// Handle of the next element in order after `handle`.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        Self::successor_in(&self.nodes, handle)
    }

    /// Handle of the previous element in order before `handle`.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        Self::predecessor_in(&self.nodes, handle)
    }

    /// Like [`successor`](Self::successor), but reads only the `nodes` arena
    /// so outstanding element borrows are unaffected.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a live tree and `handle` must name one of its
    ///   nodes.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: The walk projects the `nodes` field only.
        unsafe { Self::successor_in(&*core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    /// Like [`predecessor`](Self::predecessor), but reads only the `nodes`
    /// arena so outstanding element borrows are unaffected.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a live tree and `handle` must name one of its
    ///   nodes.
    pub(crate) unsafe fn predecessor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: The walk projects the `nodes` field only.
        unsafe { Self::predecessor_in(&*core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    fn min_in(nodes: &Arena<Node>, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = nodes.get(current).left() {
            current = left;
        }
        current
    }

    fn max_in(nodes: &Arena<Node>, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(right) = nodes.get(current).right() {
            current = right;
        }
        current
    }

    fn successor_in(nodes: &Arena<Node>, handle: Handle) -> Option<Handle> {
        if let Some(right) = nodes.get(handle).right() {
            return Some(Self::min_in(nodes, right));
        }
        // No right subtree: climb while we are a right child.
        let mut child = handle;
        while let Some(parent) = nodes.get(child).parent() {
            if nodes.get(parent).left() == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    fn predecessor_in(nodes: &Arena<Node>, handle: Handle) -> Option<Handle> {
        if let Some(left) = nodes.get(handle).left() {
            return Some(Self::max_in(nodes, left));
        }
        let mut child = handle;
        while let Some(parent) = nodes.get(child).parent() {
            if nodes.get(parent).right() == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    /// Binary search with a caller-built probe: `f(stored)` reports how the
    /// target compares against `stored`, so lookups can compare against
    /// borrowed forms of the element. Returns the matching node, if any.
    pub(crate) fn find_by<F>(&self, mut f: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = self.root;
        while let Some(current) = cursor {
            cursor = match f(self.value(current)) {
                Ordering::Less => self.node(current).left(),
                Ordering::Greater => self.node(current).right(),
                Ordering::Equal => return Some(current),
            };
        }
        None
    }

    /// First node the probe's target would sort at or before: the leftmost
    /// `stored` with `f(stored) != Greater`. [`None`] if the target is
    /// greater than everything stored.
    pub(crate) fn lower_bound_by<F>(&self, mut f: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = self.root;
        let mut candidate = None;
        while let Some(current) = cursor {
            cursor = match f(self.value(current)) {
                Ordering::Greater => self.node(current).right(),
                _ => {
                    candidate = Some(current);
                    self.node(current).left()
                }
            };
        }
        candidate
    }

    /// First node strictly after the probe's target: the leftmost `stored`
    /// with `f(stored) == Less`. [`None`] if nothing stored is greater.
    pub(crate) fn upper_bound_by<F>(&self, mut f: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = self.root;
        let mut candidate = None;
        while let Some(current) = cursor {
            cursor = match f(self.value(current)) {
                Ordering::Less => {
                    candidate = Some(current);
                    self.node(current).left()
                }
                _ => self.node(current).right(),
            };
        }
        candidate
    }

    /// Both bounds of the run equal to the probe's target. Elements are
    /// unique, so the run holds zero or one node and the two bounds are
    /// either adjacent or identical.
    pub(crate) fn equal_range_by<F>(&self, mut f: F) -> (Option<Handle>, Option<Handle>)
    where
        F: FnMut(&T) -> Ordering,
    {
        (self.lower_bound_by(&mut f), self.upper_bound_by(&mut f))
    }

    /// Unlinks the node at `handle` and returns its element.
    ///
    /// A node with two children first trades tree positions (links and
    /// colors, not element slots) with its in-order successor, so every other
    /// handle keeps naming the element it named before the call.
    pub(crate) fn erase_at(&mut self, handle: Handle) -> T {
        if let (Some(_), Some(right)) = (self.node(handle).left(), self.node(handle).right()) {
            let next = Self::min_in(&self.nodes, right);
            self.swap_nodes(handle, next);
        }

        // At most one child remains below `handle`.
        let parent = self.node(handle).parent();
        let child = self.node(handle).left().or(self.node(handle).right());
        match child {
            Some(child) => {
                // A lone child is always red; promoting and blackening it
                // keeps every path's black count intact.
                self.relink(parent, handle, Some(child));
                self.node_mut(child).set_parent(parent);
                self.node_mut(child).set_color(Color::Black);
            }
            None => {
                let deficient = self.node(handle).color() == Color::Black;
                let side = parent.map(|parent| self.side_of(handle, parent));
                self.relink(parent, handle, None);
                if deficient {
                    if let (Some(parent), Some(side)) = (parent, side) {
                        self.erase_fixup(parent, side);
                    }
                }
            }
        }

        self.len -= 1;
        let node = self.nodes.take(handle);
        self.values.take(node.value_handle())
    }

    /// Erases every element from `from` up to but not including `to`,
    /// returning how many were removed. [`None`] is the end position. `to`
    /// must not precede `from`.
    pub(crate) fn erase_range(&mut self, from: Option<Handle>, to: Option<Handle>) -> usize {
        let mut removed = 0;
        let mut cursor = from;
        while cursor != to {
            let handle = cursor.expect("`RawRBTree::erase_range()` - range ran past the end!");
            cursor = self.successor(handle);
            self.erase_at(handle);
            removed += 1;
        }
        removed
    }

    /// Which side of `parent` its existing child `handle` hangs on.
    fn side_of(&self, handle: Handle, parent: Handle) -> Side {
        if self.node(parent).left() == Some(handle) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Color test that treats absent children as black.
    fn is_red(&self, handle: Option<Handle>) -> bool {
        self.red_of(handle).is_some()
    }

    /// Passes `handle` through only when it names a red node.
    fn red_of(&self, handle: Option<Handle>) -> Option<Handle> {
        handle.filter(|&handle| self.node(handle).color() == Color::Red)
    }

    /// Redirects the parent-or-root link currently pointing at `old` to
    /// `new`. `old`'s own links are untouched.
    fn relink(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.node_mut(parent).set_child(side, new);
            }
        }
    }

    /// Rotates `handle` down toward `side`, promoting its child on the other
    /// side. In-order positions are unchanged; only path shapes move.
    fn rotate(&mut self, handle: Handle, side: Side) {
        let up = self
            .node(handle)
            .child(side.opposite())
            .expect("`RawRBTree::rotate()` - no child to promote!");
        let across = self.node(up).child(side);
        let parent = self.node(handle).parent();

        // The promoted child's inner subtree crosses over to `handle`.
        self.node_mut(handle).set_child(side.opposite(), across);
        if let Some(across) = across {
            self.node_mut(across).set_parent(Some(handle));
        }

        self.node_mut(up).set_child(side, Some(handle));
        self.node_mut(handle).set_parent(Some(up));

        self.relink(parent, handle, Some(up));
        self.node_mut(up).set_parent(parent);
    }

    /// Exchanges the tree positions of `a` and `b`: colors and every link,
    /// while each element stays put in its own arena slot.
    ///
    /// When one node is the other's parent, the early steps write transient
    /// self-links that the later steps read back and resolve, so the
    /// statement order here is load-bearing.
    fn swap_nodes(&mut self, a: Handle, b: Handle) {
        let color_a = self.node(a).color();
        let color_b = self.node(b).color();
        self.node_mut(a).set_color(color_b);
        self.node_mut(b).set_color(color_a);

        // Left children: re-parent both, then trade the links.
        let left_a = self.node(a).left();
        let left_b = self.node(b).left();
        if let Some(left) = left_a {
            self.node_mut(left).set_parent(Some(b));
        }
        if let Some(left) = left_b {
            self.node_mut(left).set_parent(Some(a));
        }
        self.node_mut(a).set_child(Side::Left, left_b);
        self.node_mut(b).set_child(Side::Left, left_a);

        // Right children, the same trade.
        let right_a = self.node(a).right();
        let right_b = self.node(b).right();
        if let Some(right) = right_a {
            self.node_mut(right).set_parent(Some(b));
        }
        if let Some(right) = right_b {
            self.node_mut(right).set_parent(Some(a));
        }
        self.node_mut(a).set_child(Side::Right, right_b);
        self.node_mut(b).set_child(Side::Right, right_a);

        // Parent down-links, read after the child trades so the adjacent
        // case sees (and then fixes) the self-links written above.
        let parent_a = self.node(a).parent();
        let parent_b = self.node(b).parent();
        self.relink(parent_a, a, Some(b));
        self.relink(parent_b, b, Some(a));
        self.node_mut(a).set_parent(parent_b);
        self.node_mut(b).set_parent(parent_a);
    }

    /// Restores uniform black counts after a black node vanished from `side`
    /// of `parent`. Either some red on the sibling side is recolored black
    /// (with rotations moving it over the deficiency), or the sibling turns
    /// red and the deficiency ascends one level.
    fn erase_fixup(&mut self, parent: Handle, side: Side) {
        let mut parent = parent;
        let mut side = side;
        loop {
            let sib = self
                .node(parent)
                .child(side.opposite())
                .expect("`RawRBTree::erase_fixup()` - deficient side has no sibling!");

            if self.is_red(Some(parent)) {
                // Red parent: its blackness pays the debt once rotated over
                // the deficient side. An inner red nephew rotates out first.
                if self.is_red(self.node(sib).child(side)) {
                    self.node_mut(parent).set_color(Color::Black);
                    self.rotate(sib, side.opposite());
                }
                self.rotate(parent, side);
                return;
            }

            if self.is_red(Some(sib)) {
                // Black parent, red sibling. The inner nephew exists and is
                // black; which of its children are red picks the repair.
                let near = self
                    .node(sib)
                    .child(side)
                    .expect("`RawRBTree::erase_fixup()` - red sibling with no inner child!");
                let outer_grandchild = self.node(near).child(side.opposite());
                let inner_grandchild = self.node(near).child(side);
                if let Some(red) = self.red_of(outer_grandchild) {
                    self.node_mut(red).set_color(Color::Black);
                    self.rotate(sib, side.opposite());
                    self.rotate(parent, side);
                } else if let Some(red) = self.red_of(inner_grandchild) {
                    let near_color = self.node(near).color();
                    let red_color = self.node(red).color();
                    self.node_mut(near).set_color(red_color);
                    self.node_mut(red).set_color(near_color);
                    self.rotate(near, side.opposite());
                    // The old inner nephew now sits below its promoted
                    // child; re-read the path to blacken it.
                    let promoted = self
                        .node(sib)
                        .child(side)
                        .expect("`RawRBTree::erase_fixup()` - rotation lost the inner nephew!");
                    let below = self
                        .node(promoted)
                        .child(side.opposite())
                        .expect("`RawRBTree::erase_fixup()` - rotation lost the inner nephew!");
                    self.node_mut(below).set_color(Color::Black);
                    self.rotate(sib, side.opposite());
                    self.rotate(parent, side);
                } else {
                    self.node_mut(sib).set_color(Color::Black);
                    self.node_mut(near).set_color(Color::Red);
                    self.rotate(parent, side);
                }
                return;
            }

            // Black parent, black sibling: a red nephew can be recolored
            // black to cover the deficiency.
            if let Some(red) = self.red_of(self.node(sib).child(side)) {
                self.node_mut(red).set_color(Color::Black);
                self.rotate(sib, side.opposite());
                self.rotate(parent, side);
                return;
            }
            if let Some(red) = self.red_of(self.node(sib).child(side.opposite())) {
                self.node_mut(red).set_color(Color::Black);
                self.rotate(parent, side);
                return;
            }

            // All black: evening out the sibling side costs a red sibling,
            // and the whole subtree is now one short. Carry the debt up.
            self.node_mut(sib).set_color(Color::Red);
            match self.node(parent).parent() {
                None => return,
                Some(grand) => {
                    side = self.side_of(parent, grand);
                    parent = grand;
                }
            }
        }
    }
}

impl<T, C: Compare<T>> RawRBTree<T, C> {
    /// Inserts `value` at its ordered position. Returns the node handle and
    /// whether a new node was created; inserting an element equal to one
    /// already stored is a no-op that drops `value` and reports the survivor.
    pub(crate) fn insert(&mut self, value: T) -> (Handle, bool) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let next = match self.cmp.compare(&value, self.value(current)) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return (current, false),
            };
            parent = Some(current);
            side = next;
            cursor = self.node(current).child(next);
        }

        let slot = self.values.alloc(value);
        let handle = self.nodes.alloc(Node::new(slot, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.node_mut(parent).set_child(side, Some(handle)),
        }
        self.len += 1;
        self.insert_fixup(handle);
        (handle, true)
    }

    /// Repairs the red-red violation a fresh red leaf can introduce. A red
    /// uncle only recolors and moves the violation up two levels; a black
    /// uncle ends it with at most two rotations around the grandparent.
    fn insert_fixup(&mut self, handle: Handle) {
        let mut handle = handle;
        loop {
            let Some(parent) = self.node(handle).parent() else {
                break;
            };
            if self.node(parent).color() == Color::Black {
                break;
            }
            let grand = self
                .node(parent)
                .parent()
                .expect("`RawRBTree::insert_fixup()` - red node with no grandparent!");
            let parent_side = self.side_of(parent, grand);

            match self.red_of(self.node(grand).child(parent_side.opposite())) {
                Some(uncle) => {
                    self.node_mut(parent).set_color(Color::Black);
                    self.node_mut(uncle).set_color(Color::Black);
                    self.node_mut(grand).set_color(Color::Red);
                    handle = grand;
                }
                None => {
                    let mut below = parent;
                    if self.side_of(handle, parent) != parent_side {
                        // Inner grandchild: straighten the zig-zag first.
                        self.rotate(parent, parent_side);
                        below = handle;
                    }
                    self.node_mut(below).set_color(Color::Black);
                    self.node_mut(grand).set_color(Color::Red);
                    self.rotate(grand, parent_side.opposite());
                    break;
                }
            }
        }

        let root = self
            .root
            .expect("`RawRBTree::insert_fixup()` - fixup on an empty tree!");
        self.node_mut(root).set_color(Color::Black);
    }
}

impl<T: Clone, C: Clone> Clone for RawRBTree<T, C> {
    /// Clones slot-for-slot: the copy has the same arena layout, so a handle
    /// obtained from the original names the same element in the clone.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            values: self.values.clone(),
            root: self.root,
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::raw::KeyOrder;

    /// Natural ordering for plain test trees.
    #[derive(Clone, Copy, Debug, Default)]
    struct Natural;

    impl<T: Ord> Compare<T> for Natural {
        fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
            lhs.cmp(rhs)
        }
    }

    /// Descending ordering, for checking that the policy really is tree
    /// state and not an ambient property of the element type.
    #[derive(Clone, Copy, Debug, Default)]
    struct Reversed;

    impl<T: Ord> Compare<T> for Reversed {
        fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
            lhs.cmp(rhs).reverse()
        }
    }

    impl<T, C: Compare<T>> RawRBTree<T, C> {
        /// Exhaustively checks the search-tree and red-black invariants plus
        /// the bookkeeping: root blackness, no red-red edges, uniform black
        /// counts, parent back-links, len, and arena occupancy.
        fn validate_invariants(&self) {
            let mut errors = vec![];

            if let Some(root) = self.root {
                if self.node(root).parent().is_some() {
                    errors.push(format!("root {root:?} has a parent"));
                }
                if self.node(root).color() == Color::Red {
                    errors.push(format!("root {root:?} is red"));
                }
                let (_, count) = self.validate_node(root, None, None, &mut errors);
                if count != self.len {
                    errors.push(format!("len {} but {count} reachable nodes", self.len));
                }
            } else if self.len != 0 {
                errors.push(format!("empty tree with len {}", self.len));
            }
            if self.nodes.len() != self.len || self.values.len() != self.len {
                errors.push(format!(
                    "arena occupancy {} nodes / {} values with len {}",
                    self.nodes.len(),
                    self.values.len(),
                    self.len
                ));
            }

            assert!(errors.is_empty(), "{}", errors.join("\n"));
        }

        /// Returns `(black_height, size)` of the subtree at `handle`,
        /// checking it against the exclusive `(min, max)` bounds.
        fn validate_node(
            &self,
            handle: Handle,
            min: Option<&T>,
            max: Option<&T>,
            errors: &mut Vec<String>,
        ) -> (usize, usize) {
            let value = self.value(handle);
            if let Some(min) = min {
                if self.cmp.compare(value, min) != Ordering::Greater {
                    errors.push(format!("{handle:?} is out of order with an ancestor"));
                }
            }
            if let Some(max) = max {
                if self.cmp.compare(value, max) != Ordering::Less {
                    errors.push(format!("{handle:?} is out of order with an ancestor"));
                }
            }

            let color = self.node(handle).color();
            let mut heights = [0usize; 2];
            let mut size = 1usize;
            for (i, side) in [Side::Left, Side::Right].into_iter().enumerate() {
                let Some(child) = self.node(handle).child(side) else {
                    continue;
                };
                if self.node(child).parent() != Some(handle) {
                    errors.push(format!("{child:?} has a stale parent link"));
                }
                if color == Color::Red && self.node(child).color() == Color::Red {
                    errors.push(format!("red {handle:?} has a red child {child:?}"));
                }
                let (child_min, child_max) = match side {
                    Side::Left => (min, Some(value)),
                    Side::Right => (Some(value), max),
                };
                let (height, child_size) = self.validate_node(child, child_min, child_max, errors);
                heights[i] = height;
                size += child_size;
            }
            if heights[0] != heights[1] {
                errors.push(format!("{handle:?} has uneven black heights {heights:?}"));
            }

            (heights[0] + usize::from(color == Color::Black), size)
        }
    }

    type TestTree = RawRBTree<i32, Natural>;

    /// Builds a tree from `values` in order, validating after every insert.
    fn tree_from(values: &[i32]) -> TestTree {
        let mut tree = RawRBTree::new(Natural);
        for &value in values {
            tree.insert(value);
            tree.validate_invariants();
        }
        tree
    }

    fn contents(tree: &TestTree) -> Vec<i32> {
        let mut out = vec![];
        let mut cursor = tree.first();
        while let Some(handle) = cursor {
            out.push(*tree.value(handle));
            cursor = tree.successor(handle);
        }
        out
    }

    fn find(tree: &TestTree, target: i32) -> Option<Handle> {
        tree.find_by(|stored| target.cmp(stored))
    }

    // ─────────────────────────── Construction ───────────────────────────

    #[test]
    fn new_trees_are_empty() {
        let tree = TestTree::new(Natural);

        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(find(&tree, 0), None);
    }

    #[test]
    fn with_capacity_preallocates() {
        let tree = TestTree::with_capacity(32, Natural);

        assert!(tree.capacity() >= 32);
        assert!(tree.is_empty());
        assert!(TestTree::max_capacity() >= 32);
    }

    // ───────────────────────────── Insertion ────────────────────────────

    #[test]
    fn ascending_insertions_stay_balanced() {
        let tree = tree_from(&(1..=64).collect::<Vec<_>>());

        assert_eq!(tree.len(), 64);
        assert_eq!(contents(&tree), (1..=64).collect::<Vec<_>>());
    }

    #[test]
    fn descending_insertions_stay_balanced() {
        let tree = tree_from(&(1..=64).rev().collect::<Vec<_>>());

        assert_eq!(contents(&tree), (1..=64).collect::<Vec<_>>());
    }

    #[test]
    fn zig_zag_insertions_rebalance_through_the_bend() {
        // Left-right: the middle value must surface as the root.
        let tree = tree_from(&[10, 30, 20]);
        let root = tree.root.unwrap();
        assert_eq!(*tree.value(root), 20);
        assert_eq!(contents(&tree), vec![10, 20, 30]);

        // Right-left mirror.
        let tree = tree_from(&[30, 10, 20]);
        let root = tree.root.unwrap();
        assert_eq!(*tree.value(root), 20);
        assert_eq!(contents(&tree), vec![10, 20, 30]);
    }

    #[test]
    fn duplicate_insertions_are_no_ops() {
        let mut tree = RawRBTree::new(KeyOrder);

        let (first, inserted) = tree.insert((5, "original"));
        assert!(inserted);
        let (again, inserted) = tree.insert((5, "ignored"));
        assert!(!inserted);

        // The surviving node is the original, value included.
        assert_eq!(again, first);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.value(first).1, "original");
    }

    // ───────────────────────────── Erasure ──────────────────────────────

    #[test]
    fn erasing_every_victim_from_every_size_rebalances() {
        for size in 1..=32 {
            for victim in 0..size {
                let mut tree = tree_from(&(0..size).collect::<Vec<_>>());
                let handle = find(&tree, victim).unwrap();

                assert_eq!(tree.erase_at(handle), victim);
                tree.validate_invariants();

                let expected: Vec<_> = (0..size).filter(|&v| v != victim).collect();
                assert_eq!(contents(&tree), expected, "size {size} victim {victim}");
            }
        }
    }

    #[test]
    fn erasure_drains_to_empty_and_back() {
        let mut tree = tree_from(&[4, 2, 6, 1, 3, 5, 7]);
        for victim in [4, 1, 7, 3, 5, 2, 6] {
            let handle = find(&tree, victim).unwrap();
            tree.erase_at(handle);
            tree.validate_invariants();
        }

        assert!(tree.is_empty());
        assert_eq!(tree.root, None);

        // The tree is fully reusable afterwards.
        tree.insert(42);
        tree.validate_invariants();
        assert_eq!(contents(&tree), vec![42]);
    }

    #[test]
    fn two_child_erasure_keeps_other_handles_valid() {
        let mut tree = tree_from(&(1..=7).collect::<Vec<_>>());
        let handles: Vec<_> = (1..=7).map(|v| find(&tree, v).unwrap()).collect();

        // 4 is the root with two children; its successor 5 takes its place.
        let four = find(&tree, 4).unwrap();
        assert_eq!(tree.erase_at(four), 4);
        tree.validate_invariants();

        // Every surviving handle still names the element it named before.
        for (i, &handle) in handles.iter().enumerate() {
            let value = i as i32 + 1;
            if value != 4 {
                assert_eq!(*tree.value(handle), value);
            }
        }
        assert_eq!(contents(&tree), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn adjacent_successor_swap_relinks_cleanly() {
        // Erasing 20 swaps it with 25, its own right child.
        let mut tree = tree_from(&[10, 5, 20, 15, 25]);
        let twenty_five = find(&tree, 25).unwrap();

        let twenty = find(&tree, 20).unwrap();
        assert_eq!(tree.erase_at(twenty), 20);
        tree.validate_invariants();

        assert_eq!(*tree.value(twenty_five), 25);
        assert_eq!(contents(&tree), vec![5, 10, 15, 25]);
    }

    #[test]
    fn erase_range_removes_the_half_open_span() {
        let mut tree = tree_from(&(1..=10).collect::<Vec<_>>());

        let removed = tree.erase_range(find(&tree, 3), find(&tree, 7));
        tree.validate_invariants();

        assert_eq!(removed, 4);
        assert_eq!(contents(&tree), vec![1, 2, 7, 8, 9, 10]);

        // An unbounded tail erases to the end.
        let removed = tree.erase_range(find(&tree, 8), None);
        tree.validate_invariants();
        assert_eq!(removed, 3);
        assert_eq!(contents(&tree), vec![1, 2, 7]);

        // An empty span removes nothing.
        assert_eq!(tree.erase_range(find(&tree, 2), find(&tree, 2)), 0);
        assert_eq!(tree.len(), 3);
    }

    // ─────────────────────── Traversal and bounds ───────────────────────

    #[test]
    fn successor_and_predecessor_walk_in_order() {
        let tree = tree_from(&[50, 20, 80, 10, 30, 70, 90]);

        let forward = contents(&tree);
        assert_eq!(forward, vec![10, 20, 30, 50, 70, 80, 90]);

        let mut backward = vec![];
        let mut cursor = tree.last();
        while let Some(handle) = cursor {
            backward.push(*tree.value(handle));
            cursor = tree.predecessor(handle);
        }
        backward.reverse();
        assert_eq!(backward, forward);
    }

    #[test]
    fn bounds_bracket_present_and_absent_targets() {
        let tree = tree_from(&[10, 20, 30, 40]);
        let at = |handle: Option<Handle>| handle.map(|h| *tree.value(h));
        let lower = |t: i32| tree.lower_bound_by(|stored| t.cmp(stored));
        let upper = |t: i32| tree.upper_bound_by(|stored| t.cmp(stored));

        // A present target: lower bound lands on it, upper bound after it.
        assert_eq!(at(lower(20)), Some(20));
        assert_eq!(at(upper(20)), Some(30));

        // An absent target: both bounds land on the next element.
        assert_eq!(at(lower(25)), Some(30));
        assert_eq!(at(upper(25)), Some(30));

        // Off both ends.
        assert_eq!(at(lower(5)), Some(10));
        assert_eq!(at(upper(45)), None);
        assert_eq!(lower(45), None);

        // The equal run is one wide when present, empty when absent.
        assert_eq!(
            tree.equal_range_by(|stored| 20.cmp(stored)),
            (lower(20), upper(20))
        );
        let (low, high) = tree.equal_range_by(|stored| 25.cmp(stored));
        assert_eq!(low, high);
    }

    #[test]
    fn drain_to_vec_empties_in_order() {
        let mut tree = tree_from(&[3, 1, 4, 1, 5, 9, 2, 6]);

        assert_eq!(tree.drain_to_vec(), vec![1, 2, 3, 4, 5, 6, 9]);
        assert!(tree.is_empty());
        assert_eq!(tree.root, None);

        tree.insert(8);
        tree.validate_invariants();
        assert_eq!(contents(&tree), vec![8]);
    }

    // ─────────────────────── Cloning and policies ───────────────────────

    #[test]
    fn clones_are_independent_and_handle_compatible() {
        let mut tree = tree_from(&(1..=10).collect::<Vec<_>>());
        let seven = find(&tree, 7).unwrap();

        let copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(*copy.value(seven), 7);

        // Mutating the original leaves the clone untouched.
        tree.erase_at(seven);
        tree.validate_invariants();
        assert_eq!(copy.len(), 10);
        assert_eq!(*copy.value(seven), 7);
        assert_eq!(contents(&copy), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn ordering_policy_is_tree_state() {
        let mut tree = RawRBTree::new(Reversed);
        for value in [1, 2, 3, 4, 5] {
            tree.insert(value);
        }

        // Probes must speak the tree's order, not the element's natural one.
        let find = |t: i32| tree.find_by(|stored: &i32| t.cmp(stored).reverse());
        assert_eq!(find(3).map(|h| *tree.value(h)), Some(3));
        assert_eq!(find(6), None);

        let mut out = vec![];
        let mut cursor = tree.first();
        while let Some(handle) = cursor {
            out.push(*tree.value(handle));
            cursor = tree.successor(handle);
        }
        assert_eq!(out, vec![5, 4, 3, 2, 1]);
    }

    // ──────────────────────────── Model test ────────────────────────────

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i32, i32),
        Remove(i32),
        Query(i32),
        Bounds(i32),
        Clear,
    }

    fn operation() -> impl Strategy<Value = Operation> {
        // Keys collide often so duplicates and removals actually bite.
        prop_oneof![
            8 => (0..64i32, any::<i32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
            4 => (0..64i32).prop_map(Operation::Remove),
            2 => (0..64i32).prop_map(Operation::Query),
            2 => (0..64i32).prop_map(Operation::Bounds),
            1 => Just(Operation::Clear),
        ]
    }

    proptest! {
        /// Drives the raw tree against `BTreeMap` with the invariants
        /// re-checked after every step.
        #[test]
        fn raw_tree_matches_btreemap(operations in prop::collection::vec(operation(), 0..200)) {
            let mut tree: RawRBTree<(i32, i32), KeyOrder> = RawRBTree::new(KeyOrder);
            let mut model = BTreeMap::new();

            for operation in operations {
                match operation {
                    Operation::Insert(key, value) => {
                        let (_, inserted) = tree.insert((key, value));
                        prop_assert_eq!(inserted, !model.contains_key(&key));
                        model.entry(key).or_insert(value);
                    }
                    Operation::Remove(key) => {
                        match tree.find_by(|stored| key.cmp(&stored.0)) {
                            Some(handle) => {
                                let (k, v) = tree.erase_at(handle);
                                prop_assert_eq!(k, key);
                                prop_assert_eq!(model.remove(&key), Some(v));
                            }
                            None => prop_assert_eq!(model.remove(&key), None),
                        }
                    }
                    Operation::Query(key) => {
                        let found = tree.find_by(|stored| key.cmp(&stored.0));
                        prop_assert_eq!(
                            found.map(|handle| tree.value(handle).1),
                            model.get(&key).copied()
                        );
                    }
                    Operation::Bounds(key) => {
                        let lower = tree.lower_bound_by(|stored| key.cmp(&stored.0));
                        let upper = tree.upper_bound_by(|stored| key.cmp(&stored.0));
                        prop_assert_eq!(
                            lower.map(|handle| tree.value(handle).0),
                            model.range(key..).next().map(|(k, _)| *k)
                        );
                        prop_assert_eq!(
                            upper.map(|handle| tree.value(handle).0),
                            model.range(key + 1..).next().map(|(k, _)| *k)
                        );
                        let range = tree.equal_range_by(|stored| key.cmp(&stored.0));
                        prop_assert_eq!(range, (lower, upper));
                    }
                    Operation::Clear => {
                        tree.clear();
                        model.clear();
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let mut drained = tree.drain_to_vec().into_iter();
            for (key, value) in model {
                prop_assert_eq!(drained.next(), Some((key, value)));
            }
            prop_assert_eq!(drained.next(), None);
        }
    }
}
