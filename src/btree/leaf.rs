//! # Leaf Nodes
//!
//! A leaf is a single flat allocation holding `count` entries packed
//! back-to-back in comparator order, with capacity for
//! `leaf_capacity_max` entries. Entry `i` lives at byte offset
//! `i * entry_size`; addressing is plain slice arithmetic, so lookups
//! touch one contiguous buffer.
//!
//! Leaves own no children. Ordering within a leaf is maintained by
//! shift-right insertion at the binary-search position, and a full leaf
//! splits at its midpoint, handing the upper half of its entries to a
//! fresh sibling.

use std::cmp::Ordering;

use crate::btree::BtreeConfig;
use crate::compare::Comparator;

/// Outcome of a leaf binary search.
///
/// `Found(i)` means entry `i` compares equal to the target. `NotFound(i)`
/// is the insertion position: the index of the first entry greater than
/// the target, or `count` when every entry is smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchResult {
    Found(usize),
    NotFound(usize),
}

/// A leaf node: flat entry buffer plus the number of live entries.
///
/// The buffer is allocated once at full capacity; `count` marks the valid
/// prefix. Bytes past `count * entry_size` are dead and never read.
pub(crate) struct Leaf {
    entries: Box<[u8]>,
    count: usize,
}

impl Leaf {
    pub(crate) fn new(config: &BtreeConfig) -> Self {
        Self {
            entries: vec![0u8; config.leaf_capacity_max * config.entry_size].into_boxed_slice(),
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn is_full(&self, config: &BtreeConfig) -> bool {
        self.count == config.leaf_capacity_max
    }

    /// Borrows entry `index`. Caller guarantees `index < count`.
    #[inline]
    pub(crate) fn entry_at<'a>(&'a self, config: &BtreeConfig, index: usize) -> &'a [u8] {
        debug_assert!(index < self.count);
        let offset = index * config.entry_size;
        &self.entries[offset..offset + config.entry_size]
    }

    /// Binary search over the live entries.
    pub(crate) fn search<C: Comparator>(
        &self,
        config: &BtreeConfig,
        comparator: &C,
        target: &[u8],
    ) -> SearchResult {
        let mut low = 0;
        let mut high = self.count;

        while low < high {
            let mid = low + (high - low) / 2;
            match comparator.compare(target, self.entry_at(config, mid)) {
                Ordering::Equal => return SearchResult::Found(mid),
                Ordering::Greater => low = mid + 1,
                Ordering::Less => high = mid,
            }
        }

        SearchResult::NotFound(low)
    }

    /// Inserts `entry` at its sorted position, shifting later entries
    /// right by one slot.
    ///
    /// The leaf must not be full. Panics if an equal entry is already
    /// present; the buffer is untouched when that happens because the
    /// search runs before any byte moves.
    pub(crate) fn insert<C: Comparator>(
        &mut self,
        config: &BtreeConfig,
        comparator: &C,
        entry: &[u8],
    ) {
        debug_assert!(!self.is_full(config));

        let index = match self.search(config, comparator, entry) {
            SearchResult::Found(_) => {
                panic!("duplicate entry: an equal entry is already present in the tree")
            }
            SearchResult::NotFound(index) => index,
        };

        let entry_size = config.entry_size;
        let offset = index * entry_size;
        let live_end = self.count * entry_size;
        self.entries
            .copy_within(offset..live_end, offset + entry_size);
        self.entries[offset..offset + entry_size].copy_from_slice(entry);
        self.count += 1;
    }

    /// Splits a full leaf at its midpoint, returning a new sibling
    /// holding the upper half of the entries.
    ///
    /// With `mid = leaf_capacity_max / 2`, entries `[0, mid)` stay here
    /// and entries `[mid, count)` move to the sibling, so for odd
    /// capacities the sibling carries the extra entry.
    pub(crate) fn split(&mut self, config: &BtreeConfig) -> Leaf {
        debug_assert!(self.is_full(config));

        let mid = config.leaf_capacity_max / 2;
        let entry_size = config.entry_size;

        let mut right = Leaf::new(config);
        let moved = self.count - mid;
        right.entries[..moved * entry_size]
            .copy_from_slice(&self.entries[mid * entry_size..self.count * entry_size]);
        right.count = moved;
        self.count = mid;

        right
    }
}
