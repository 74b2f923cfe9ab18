//! # Tree Handle
//!
//! [`Btree`] owns the root node and the tree-level bookkeeping: the
//! configuration, the comparator, the total entry count, and the height.
//! All data lives in leaves; branches carry separator keys and the
//! cumulative subtree-size tables that drive rank descent.
//!
//! ## Structure
//!
//! ```text
//!                  [branch: keys + cumulative]
//!                  /           |            \
//!          [leaf 0..k)   [leaf k..m)   [leaf m..n)
//! ```
//!
//! All leaves sit at the same depth. Splits propagate upward and the
//! tree grows in height only when the root itself splits, so the
//! balance invariant needs no rebalancing pass.
//!
//! ## Rank access
//!
//! `fetch(r)` walks one branch per level, scanning the cumulative table
//! for the child covering rank `r` and subtracting the entries skipped
//! to its left. At the leaf the remaining rank is a direct index, and
//! the call also reports how many entries follow contiguously in that
//! leaf, so batch readers can consume runs without re-descending.
//!
//! ## Memory
//!
//! - Ordered iteration keeps its descent path in a
//!   `SmallVec<[_; MAX_TREE_DEPTH]>`, stack-allocated for trees up to
//!   8 levels (fanout 32 covers about 10^12 entries at that height).
//! - Nodes are single flat allocations; teardown is the ownership
//!   tree's recursive drop.

use std::cmp::Ordering;
use std::fmt;

use eyre::{ensure, Result};
use smallvec::SmallVec;
use tracing::debug;

use crate::btree::branch::Branch;
use crate::btree::leaf::Leaf;
use crate::btree::node::{Node, Split};
use crate::btree::BtreeConfig;
use crate::compare::Comparator;

/// Maximum tree depth the cursor keeps on its inline stack.
pub const MAX_TREE_DEPTH: usize = 8;

/// An in-memory ordered index over fixed-size entries.
///
/// Entries are opaque byte records of exactly `entry_size` bytes,
/// ordered by the comparator supplied at construction. Inserting an
/// entry equal to one already stored is an invariant violation and
/// panics; all caller-contract failures (construction parameters, rank
/// range) are recoverable errors.
pub struct Btree<C: Comparator> {
    config: BtreeConfig,
    comparator: C,
    root: Box<Node>,
    entry_count: usize,
    height: usize,
}

impl<C: Comparator> Btree<C> {
    /// Creates an empty tree.
    ///
    /// `branch_fanout_max` is the maximum child count of a branch,
    /// `leaf_capacity_max` the maximum entry count of a leaf, and
    /// `entry_size` the exact byte length of every entry. Both maxima
    /// must be at least 2 and `entry_size` at least 1; the checks run
    /// before any allocation.
    pub fn new(
        branch_fanout_max: usize,
        leaf_capacity_max: usize,
        entry_size: usize,
        comparator: C,
    ) -> Result<Self> {
        ensure!(
            branch_fanout_max >= 2,
            "branch fanout must be at least 2, got {branch_fanout_max}"
        );
        ensure!(
            leaf_capacity_max >= 2,
            "leaf capacity must be at least 2, got {leaf_capacity_max}"
        );
        ensure!(entry_size >= 1, "entry size must be at least 1 byte");

        let config = BtreeConfig {
            branch_fanout_max,
            leaf_capacity_max,
            entry_size,
        };
        let root = Box::new(Node::Leaf(Leaf::new(&config)));
        debug!(
            branch_fanout_max,
            leaf_capacity_max, entry_size, "btree.create"
        );

        Ok(Self {
            config,
            comparator,
            root,
            entry_count: 0,
            height: 0,
        })
    }

    /// The configuration the tree was built with.
    #[inline]
    pub fn config(&self) -> &BtreeConfig {
        &self.config
    }

    /// Total number of entries stored, maintained without traversal.
    #[inline]
    pub fn len(&self) -> usize {
        self.entry_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Height of the root: 0 for a single-leaf tree, incremented on
    /// every root split.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Inserts an entry of exactly `entry_size` bytes.
    ///
    /// Panics if an equal entry is already stored; duplicate detection
    /// happens before any structural change is observable. A wrong-sized
    /// entry also panics, since the comparator contract promises
    /// equal-length arguments.
    pub fn insert(&mut self, entry: &[u8]) {
        assert_eq!(
            entry.len(),
            self.config.entry_size,
            "entry length must equal the configured entry size"
        );

        if let Some(split) = self.root.insert(&self.config, &self.comparator, entry) {
            self.grow_root(split);
        }
        self.entry_count += 1;
    }

    /// Replaces the root with a new two-child branch over the split
    /// halves. The only way the tree grows in height.
    fn grow_root(&mut self, split: Split) {
        let old_root = std::mem::replace(
            &mut self.root,
            Box::new(Node::Branch(Branch::new(&self.config))),
        );
        let Node::Branch(root) = self.root.as_mut() else {
            unreachable!("grow_root just installed a branch root")
        };
        root.init_root(&self.config, old_root, &split.separator, split.right);
        self.height += 1;
        debug!(height = self.height, "btree.root_split");
    }

    /// Returns the entry with the given rank (0 = smallest) and the
    /// number of entries stored contiguously from it in its leaf,
    /// the returned entry included.
    ///
    /// Ranks at or past `len()` are a caller error, not a tree fault.
    pub fn fetch(&self, rank: usize) -> Result<(&[u8], usize)> {
        ensure!(
            rank < self.entry_count,
            "rank {rank} out of range for a tree of {} entries",
            self.entry_count
        );

        let mut node = self.root.as_ref();
        let mut rank = rank;
        loop {
            match node {
                Node::Branch(branch) => {
                    let (child_index, skipped) = branch.locate_rank(rank);
                    rank -= skipped;
                    node = branch.child(child_index);
                }
                Node::Leaf(leaf) => {
                    return Ok((leaf.entry_at(&self.config, rank), leaf.count() - rank));
                }
            }
        }
    }

    /// Iterates every entry in comparator order.
    pub fn entries(&self) -> Cursor<'_> {
        Cursor::new(&self.config, self.root.as_ref())
    }

    /// Writes an indented structural rendering of the tree into `out`,
    /// formatting each entry and separator key through `format_entry`.
    pub fn dump<W, F>(&self, out: &mut W, format_entry: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&[u8]) -> String,
    {
        writeln!(out, "btree with {} entries", self.entry_count)?;
        self.dump_node(self.root.as_ref(), 0, out, &format_entry)
    }

    fn dump_node<W, F>(&self, node: &Node, depth: usize, out: &mut W, format_entry: &F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&[u8]) -> String,
    {
        let pad = "  ".repeat(depth);
        match node {
            Node::Leaf(leaf) => {
                write!(out, "{pad}[{} entries]{{ ", leaf.count())?;
                for i in 0..leaf.count() {
                    write!(out, "{} ", format_entry(leaf.entry_at(&self.config, i)))?;
                }
                writeln!(out, "}}")?;
            }
            Node::Branch(branch) => {
                writeln!(
                    out,
                    "{pad}[{} children, {} entries]{{",
                    branch.child_count(),
                    branch.entry_count()
                )?;
                for i in 0..branch.child_count() {
                    if i != 0 {
                        writeln!(
                            out,
                            "{pad}  ({})",
                            format_entry(branch.key_at(&self.config, i - 1))
                        )?;
                    }
                    self.dump_node(branch.child(i), depth + 1, out, format_entry)?;
                    if i + 1 < branch.child_count() {
                        writeln!(out, "{pad}  [{} cumulative entries]", branch.cumulative_at(i))?;
                    }
                }
                writeln!(out, "{pad}}}")?;
            }
        }
        Ok(())
    }

    /// Walks the whole tree and checks its structural invariants:
    /// strict entry order, separator keys equal to right-subtree minima,
    /// uniform leaf depth, occupancy bounds on non-root nodes, cumulative
    /// table sums, and the tree-level total count.
    pub fn verify(&self) -> Result<()> {
        let mut leaf_depth = None;
        let total = self.verify_node(self.root.as_ref(), 0, true, &mut leaf_depth)?;
        ensure!(
            total == self.entry_count,
            "tree total {} does not match stored count {}",
            total,
            self.entry_count
        );

        let mut prev: Option<&[u8]> = None;
        for entry in self.entries() {
            if let Some(prev) = prev {
                ensure!(
                    self.comparator.compare(prev, entry) == Ordering::Less,
                    "entries are not in strictly increasing order"
                );
            }
            prev = Some(entry);
        }
        Ok(())
    }

    fn verify_node(
        &self,
        node: &Node,
        depth: usize,
        is_root: bool,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize> {
        match node {
            Node::Leaf(leaf) => {
                match *leaf_depth {
                    Some(expected) => ensure!(
                        depth == expected,
                        "leaf at depth {depth} but the first leaf sits at depth {expected}"
                    ),
                    None => *leaf_depth = Some(depth),
                }
                if !is_root {
                    let lower = self.config.leaf_capacity_max / 2;
                    ensure!(
                        leaf.count() >= lower,
                        "non-root leaf holds {} entries, below the minimum {lower}",
                        leaf.count()
                    );
                }
                for i in 1..leaf.count() {
                    let a = leaf.entry_at(&self.config, i - 1);
                    let b = leaf.entry_at(&self.config, i);
                    ensure!(
                        self.comparator.compare(a, b) == Ordering::Less,
                        "leaf entries out of order at index {i}"
                    );
                }
                Ok(leaf.count())
            }
            Node::Branch(branch) => {
                let lower = if is_root {
                    2
                } else {
                    self.config.branch_fanout_max / 2
                };
                ensure!(
                    branch.child_count() >= lower,
                    "branch holds {} children, below the minimum {lower}",
                    branch.child_count()
                );
                ensure!(
                    branch.child_count() <= self.config.branch_fanout_max,
                    "branch holds {} children, above the fanout {}",
                    branch.child_count(),
                    self.config.branch_fanout_max
                );

                let mut total = 0;
                for i in 0..branch.child_count() {
                    total += self.verify_node(branch.child(i), depth + 1, false, leaf_depth)?;
                    if i >= 1 {
                        let key = branch.key_at(&self.config, i - 1);
                        let min = branch.child(i).first_entry(&self.config);
                        ensure!(
                            key == min,
                            "separator key {} does not equal its right subtree's minimum",
                            i - 1
                        );
                    }
                    if i < branch.key_count() {
                        ensure!(
                            branch.cumulative_at(i) == total,
                            "cumulative slot {i} holds {}, expected {total}",
                            branch.cumulative_at(i)
                        );
                    }
                }
                ensure!(
                    branch.entry_count() == total,
                    "branch total {} does not match its children's sum {total}",
                    branch.entry_count()
                );
                Ok(total)
            }
        }
    }
}

type CursorStack<'a> = SmallVec<[(&'a Branch, usize); MAX_TREE_DEPTH]>;

/// Ordered iterator over every entry in a tree.
///
/// Holds the descent path from the root to the current leaf; advancing
/// past a leaf ascends to the nearest ancestor with an unvisited child
/// and descends to that child's leftmost leaf.
pub struct Cursor<'a> {
    config: &'a BtreeConfig,
    stack: CursorStack<'a>,
    leaf: &'a Leaf,
    index: usize,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a BtreeConfig, root: &'a Node) -> Self {
        let mut stack = CursorStack::new();
        let leaf = Self::descend_leftmost(&mut stack, root);
        Self {
            config,
            stack,
            leaf,
            index: 0,
        }
    }

    fn descend_leftmost(stack: &mut CursorStack<'a>, mut node: &'a Node) -> &'a Leaf {
        loop {
            match node {
                Node::Branch(branch) => {
                    stack.push((branch, 0));
                    node = branch.child(0);
                }
                Node::Leaf(leaf) => return leaf,
            }
        }
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.index < self.leaf.count() {
            let entry = self.leaf.entry_at(self.config, self.index);
            self.index += 1;
            return Some(entry);
        }

        loop {
            let (branch, child_index) = self.stack.pop()?;
            let next_child = child_index + 1;
            if next_child < branch.child_count() {
                self.stack.push((branch, next_child));
                self.leaf = Self::descend_leftmost(&mut self.stack, branch.child(next_child));
                self.index = 1;
                return Some(self.leaf.entry_at(self.config, 0));
            }
        }
    }
}
