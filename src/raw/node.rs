use super::handle::Handle;

/// Node color for red-black balancing.
///
/// Absent children count as black; only stored nodes carry an explicit color.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a node a link occupies.
///
/// The rebalancing fixups come in mirrored left/right pairs; writing them
/// once over `Side` and flipping with [`opposite`](Side::opposite) halves
/// the case code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One tree position: color, links, and the handle of its element in the
/// values arena (separate from nodes so mutable iteration never touches
/// node storage and vice versa).
#[derive(Clone, Debug)]
pub(crate) struct Node {
    value: Handle,
    color: Color,
    // Non-owning back-link; used for traversal and rebalancing bookkeeping
    // only, never for destruction decisions. The arena owns the memory.
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl Node {
    /// Creates a detached leaf below `parent`. New nodes always start red so
    /// an insertion can only ever violate the red-red rule, not black-height.
    pub(crate) const fn new(value: Handle, parent: Option<Handle>) -> Self {
        Self {
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    /// Returns the handle of the stored element in the values arena.
    #[inline]
    pub(crate) const fn value_handle(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Returns the child link on `side`.
    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Replaces the child link on `side`; the old link is dropped silently.
    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }
}
