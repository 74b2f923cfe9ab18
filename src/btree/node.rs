//! # Node Variants and the Insertion Engine
//!
//! [`Node`] is the tagged union over the two node kinds, and
//! [`Node::insert`] is the recursive descent that keeps the tree
//! balanced: inserts land in a leaf, full nodes split at their midpoint,
//! and each split hands a `(separator, new sibling)` pair back to its
//! parent until some ancestor absorbs it or the root itself splits.
//!
//! Height only ever grows at the root; the tree handle turns a split
//! that escapes the root into a new two-child root.

use std::cmp::Ordering;

use tracing::trace;

use crate::btree::branch::{Branch, BranchSearch};
use crate::btree::leaf::{Leaf, SearchResult};
use crate::btree::BtreeConfig;
use crate::compare::Comparator;

/// One tree node, leaf or branch.
pub(crate) enum Node {
    Leaf(Leaf),
    Branch(Branch),
}

/// The upward half of a node split.
///
/// `separator` is the minimum entry of `right`'s subtree, copied out so
/// the parent can store it as the key between the split halves.
pub(crate) struct Split {
    pub(crate) separator: Vec<u8>,
    pub(crate) right: Box<Node>,
}

impl Node {
    /// Total entry count of this node's subtree.
    #[inline]
    pub(crate) fn entry_count(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.count(),
            Node::Branch(branch) => branch.entry_count(),
        }
    }

    /// Minimum entry of this node's subtree, by leftmost descent.
    ///
    /// The subtree must be non-empty; only the root of an empty tree is
    /// an empty node.
    pub(crate) fn first_entry<'a>(&'a self, config: &BtreeConfig) -> &'a [u8] {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(leaf) => return leaf.entry_at(config, 0),
                Node::Branch(branch) => node = branch.child(0),
            }
        }
    }

    /// Inserts `entry` into this subtree, splitting on the way back up
    /// as needed.
    ///
    /// Returns `None` when the subtree absorbed the entry, or the
    /// [`Split`] the parent must place. Panics if an equal entry already
    /// exists anywhere in the subtree; the check runs before any
    /// structural change at the level that detects it.
    pub(crate) fn insert<C: Comparator>(
        &mut self,
        config: &BtreeConfig,
        comparator: &C,
        entry: &[u8],
    ) -> Option<Split> {
        match self {
            Node::Leaf(leaf) => Self::insert_leaf(leaf, config, comparator, entry),
            Node::Branch(branch) => Self::insert_branch(branch, config, comparator, entry),
        }
    }

    fn insert_leaf<C: Comparator>(
        leaf: &mut Leaf,
        config: &BtreeConfig,
        comparator: &C,
        entry: &[u8],
    ) -> Option<Split> {
        if !leaf.is_full(config) {
            leaf.insert(config, comparator, entry);
            return None;
        }

        // The duplicate check must precede the split so a rejected entry
        // leaves the leaf bytes untouched.
        if let SearchResult::Found(_) = leaf.search(config, comparator, entry) {
            panic!("duplicate entry: an equal entry is already present in the tree");
        }

        let mut right = leaf.split(config);
        if comparator.compare(entry, right.entry_at(config, 0)) == Ordering::Less {
            leaf.insert(config, comparator, entry);
        } else {
            right.insert(config, comparator, entry);
        }

        let separator = right.entry_at(config, 0).to_vec();
        trace!(
            left = leaf.count(),
            right = right.count(),
            "btree.leaf_split"
        );
        Some(Split {
            separator,
            right: Box::new(Node::Leaf(right)),
        })
    }

    fn insert_branch<C: Comparator>(
        branch: &mut Branch,
        config: &BtreeConfig,
        comparator: &C,
        entry: &[u8],
    ) -> Option<Split> {
        let child_index = match branch.search(config, comparator, entry) {
            BranchSearch::ExactKey(_) => {
                panic!("duplicate entry: target equals a separator key already in the tree")
            }
            BranchSearch::Descend(index) => index,
        };

        let Some(Split { separator, right }) =
            branch.child_mut(child_index).insert(config, comparator, entry)
        else {
            branch.record_insertion(child_index);
            return None;
        };

        if !branch.is_full(config) {
            branch.insert_child(config, &separator, child_index + 1, right);
            return None;
        }

        let mid = config.branch_fanout_max / 2;
        let mut new_branch = branch.split(config);
        if child_index < mid {
            branch.insert_child(config, &separator, child_index + 1, right);
        } else {
            new_branch.insert_child(config, &separator, child_index - mid + 1, right);
        }

        // The separator between the halves was dropped by the split; the
        // promoted key is re-derived from the sibling's final leftmost
        // subtree, which the sibling insert above may have changed.
        let promoted = new_branch.child(0).first_entry(config).to_vec();
        trace!(
            left_children = branch.child_count(),
            right_children = new_branch.child_count(),
            "btree.branch_split"
        );
        Some(Split {
            separator: promoted,
            right: Box::new(Node::Branch(new_branch)),
        })
    }
}
