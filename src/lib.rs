//! # memtree - In-Memory Ordered Index with Rank Access
//!
//! memtree is an embeddable ordered index over fixed-size opaque byte
//! records, built as a balanced multi-way search tree with flat node
//! buffers. It is the indexing primitive a storage engine puts beneath
//! a table or key space:
//!
//! - **Sorted iteration**: a cursor yields every entry in comparator
//!   order without materializing the set.
//! - **Duplicate-free insertion**: entries form a strict total order;
//!   inserting an equal entry is an invariant violation and panics.
//! - **Rank access**: `fetch(r)` returns the r-th smallest entry in
//!   O(height * fanout) via per-branch cumulative size tables, along
//!   with the number of entries stored contiguously after it.
//!
//! ## Quick Start
//!
//! ```
//! use memtree::{Btree, U64LeCompare};
//!
//! # fn main() -> eyre::Result<()> {
//! let mut tree = Btree::new(32, 64, 8, U64LeCompare)?;
//! for value in [30u64, 10, 20] {
//!     tree.insert(&value.to_le_bytes());
//! }
//!
//! let (entry, _run) = tree.fetch(0)?;
//! assert_eq!(entry, &10u64.to_le_bytes());
//!
//! let ordered: Vec<&[u8]> = tree.entries().collect();
//! assert_eq!(ordered.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Tree Handle (Btree)          │  create / insert / fetch /
//! │                                     │  cursor / dump / verify
//! ├─────────────────────────────────────┤
//! │   Insertion Engine (Node enum)      │  recursive descent, splits
//! ├──────────────────┬──────────────────┤
//! │   Leaf Nodes     │  Branch Nodes    │  flat buffers, cumulative
//! │                  │                  │  subtree-size tables
//! ├──────────────────┴──────────────────┤
//! │     Comparator (caller-supplied)    │  strict total order
//! └─────────────────────────────────────┘
//! ```
//!
//! Entries are opaque to every layer above the comparator: the tree
//! never interprets their bytes, only their order. Any closure
//! `Fn(&[u8], &[u8]) -> Ordering` works as a comparator, so collation
//! state lives with the caller, not in the tree.
//!
//! ## Error Model
//!
//! Caller-contract failures (construction parameters, out-of-range
//! rank) are recoverable [`eyre::Result`] errors. Invariant violations
//! (duplicate insertion) panic immediately, before any structural
//! mutation becomes observable. Concurrency and persistence are out of
//! scope; the tree is a single-threaded in-memory structure whose
//! teardown is its recursive drop.

pub mod btree;
pub mod compare;

pub use btree::{Btree, BtreeConfig, Cursor, MAX_TREE_DEPTH};
pub use compare::{Comparator, U64LeCompare};
