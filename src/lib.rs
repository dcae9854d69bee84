//! Arena-backed red-black tree collections for Rust.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`], ordered collections
//! that mirror the standard library's `BTreeMap` and `BTreeSet` API on top
//! of a classic red-black tree, plus a small [`Stack`] adapter over `Vec`:
//!
//! - [`range`](RBTreeMap::range) / [`equal_range`](RBTreeMap::equal_range) -
//!   Double-ended in-order iteration over any sub-range of keys
//! - [`entry`](RBTreeMap::entry) - In-place manipulation of a single slot
//!   with one tree descent
//! - [`remove_range`](RBTreeMap::remove_range) - Bulk erasure of a key range
//!
//! # Example
//!
//! ```
//! use rbtree_arena::RBTreeMap;
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard BTreeMap operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Insertion keeps the stored value on duplicate keys
//! assert!(!scores.insert("Bob", 0));
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//!
//! // Keys come back in sorted order
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // Range queries over any sub-range of keys
//! assert_eq!(scores.range("B".."D").count(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library
//!   dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap`/`BTreeSet`,
//!   with first-insert-wins duplicate handling
//! - **Index-based arena storage** - Nodes live in one contiguous buffer
//!   and link to each other through integer handles, not owning pointers
//! - **Iterative algorithms** - Clone, drop, clear, and all traversals run
//!   without call-stack recursion, so deep trees cannot overflow the stack
//!
//! # Implementation
//!
//! The collections are implemented as a red-black tree whose nodes are
//! allocated from an arena and wired together with parent, left, and right
//! handles. The parent links make every iterator a pair of handles stepping
//! through the tree in O(1) amortized time per element, with no auxiliary
//! stack. Erasing a node with two children swaps it structurally with its
//! in-order successor, so handles keep naming the same elements across
//! removals.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: We have to allow unsafe code for the raw-pointer iterators over the arena.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod rbtree_map;
pub mod rbtree_set;
pub mod stack;

pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
pub use stack::Stack;
