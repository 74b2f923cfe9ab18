//! Fuzz testing for tree insertion.
//!
//! This fuzz target drives a tree with arbitrary shape parameters and
//! an arbitrary u64 insert stream, then checks every structural
//! invariant plus ordered traversal and rank access against a sorted
//! model of the inserted values.

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use memtree::{Btree, U64LeCompare};

#[derive(Debug, Arbitrary)]
struct InsertInput {
    fanout: u8,
    capacity: u8,
    values: Vec<u64>,
}

fuzz_target!(|input: InsertInput| {
    let fanout = 2 + (input.fanout % 15) as usize;
    let capacity = 2 + (input.capacity % 15) as usize;

    let mut tree = Btree::new(fanout, capacity, 8, U64LeCompare).unwrap();
    let mut seen = HashSet::new();
    let mut inserted = Vec::new();
    for v in input.values {
        if seen.insert(v) {
            tree.insert(&v.to_le_bytes());
            inserted.push(v);
        }
    }

    tree.verify().unwrap();
    assert_eq!(tree.len(), inserted.len());

    inserted.sort_unstable();
    let ordered: Vec<u64> = tree
        .entries()
        .map(|e| u64::from_le_bytes(e.try_into().unwrap()))
        .collect();
    assert_eq!(ordered, inserted);

    for (rank, v) in inserted.iter().enumerate() {
        let (entry, run) = tree.fetch(rank).unwrap();
        assert_eq!(entry, &v.to_le_bytes());
        assert!(run >= 1);
    }
    assert!(tree.fetch(inserted.len()).is_err());
});
