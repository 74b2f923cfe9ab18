//! # B-Tree Index Implementation
//!
//! This module implements the balanced multi-way search tree behind the
//! crate: an in-memory ordered index over fixed-size opaque entries with
//! rank access. The design prioritizes flat, cache-friendly node buffers
//! and O(1) slot addressing.
//!
//! ## Node Types
//!
//! - **Leaf Nodes**: Store the entries themselves, packed back-to-back
//!   in comparator order inside one flat allocation.
//!
//! - **Branch Nodes**: Store child nodes, separator keys, and a
//!   cumulative subtree-size table. The separator key at position i is
//!   the smallest entry in the subtree rooted at child i+1.
//!
//! ## Node Layout (Branch)
//!
//! ```text
//! +---------------------------+
//! | children: Vec<Box<Node>>  |  child subtrees, in key order
//! +---------------------------+
//! | keys: Box<[u8]>           |  (fanout - 1) entry-sized slots
//! +---------------------------+
//! | cumulative: Box<[usize]>  |  cumulative[i] = entries in 0..=i
//! +---------------------------+
//! | entry_count: usize        |  total entries below this branch
//! +---------------------------+
//! ```
//!
//! The parallel arrays carry explicit lengths derived from the child
//! count, so key and table addressing is plain slice arithmetic.
//!
//! ## Balance
//!
//! All leaves sit at the same depth. Full nodes split at their midpoint
//! and hand a `(separator, sibling)` pair to the parent; when a split
//! escapes the root, the tree grows a new two-child root. No other
//! operation changes the height.
//!
//! ## Rank Access
//!
//! The cumulative tables let `fetch(rank)` descend one child per level
//! without walking siblings, giving O(height * fanout) rank lookups and
//! a contiguous run length at the leaf for batch readers.

mod branch;
mod leaf;
mod node;
mod tree;

pub use tree::{Btree, Cursor, MAX_TREE_DEPTH};

/// Shape parameters a tree is constructed with, fixed for its lifetime.
///
/// `entry_size` is the exact byte length of every entry and separator
/// key; `branch_fanout_max` and `leaf_capacity_max` bound the node
/// sizes. Validated by [`Btree::new`] before any allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtreeConfig {
    pub branch_fanout_max: usize,
    pub leaf_capacity_max: usize,
    pub entry_size: usize,
}
