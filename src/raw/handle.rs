use core::num::NonZero;

// Narrow the index under test so suites actually exercise slot reuse and the
// capacity bound; production builds get the full u32 range.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable index of a node slot in the arena.
///
/// Stored shifted by one in a `NonZero` so that `Option<Handle>`, the form
/// every parent/child link takes, is the same size as `Handle` itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest addressable slot index, and therefore the most nodes a tree
    /// can hold.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::new()` - `index` > `Handle::MAX`!");
        // SAFETY: `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
