#![cfg(test)]

// Property tests for BucketTable kept inside the crate so they can reach
// the structural counters (filled buckets, version, chain lengths).

use crate::equality::{from_fns, DefaultEquality, Equality};
use crate::table::{BucketTable, Walk};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    Delete(i32),
    Contains(i32),
    Clear,
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    // A narrow value range keeps collisions and duplicate inserts frequent.
    let value = -40i32..40;
    let op = prop_oneof![
        6 => value.clone().prop_map(Op::Insert),
        3 => value.clone().prop_map(Op::Delete),
        2 => value.prop_map(Op::Contains),
        1 => Just(Op::Clear),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..150)
}

fn walk_all(table: &BucketTable<i32>) -> Vec<i32> {
    let mut walk = Walk::default();
    let mut out = Vec::new();
    while let Some(k) = walk.advance(table) {
        if let Some(v) = table.value(k) {
            out.push(*v);
        }
    }
    out
}

fn run_state_machine<E: Equality<i32>>(
    eq: &E,
    initial_capacity: usize,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut sut = BucketTable::with_capacity(initial_capacity);
    let mut model: HashSet<i32> = HashSet::new();

    for op in ops {
        let version_before = sut.version();
        match op {
            Op::Insert(v) => {
                let inserted = sut.insert(eq, v);
                prop_assert_eq!(inserted, model.insert(v));
                let expected = if inserted { version_before + 1 } else { version_before };
                prop_assert_eq!(sut.version(), expected);
            }
            Op::Delete(v) => {
                let removed = sut.delete(eq, &v);
                prop_assert_eq!(removed.is_some(), model.remove(&v));
                if let Some(r) = removed {
                    prop_assert_eq!(r, v);
                    prop_assert_eq!(sut.version(), version_before + 1);
                } else {
                    prop_assert_eq!(sut.version(), version_before);
                }
            }
            Op::Contains(v) => {
                prop_assert_eq!(sut.contains(eq, &v), model.contains(&v));
                prop_assert_eq!(sut.version(), version_before);
            }
            Op::Clear => {
                let was_empty = model.is_empty();
                sut.clear();
                model.clear();
                let expected = if was_empty { version_before } else { version_before + 1 };
                prop_assert_eq!(sut.version(), expected);
            }
            Op::Iterate => {
                let seen = walk_all(&sut);
                prop_assert_eq!(seen.len(), model.len(), "no element visited twice");
                let seen: HashSet<i32> = seen.into_iter().collect();
                prop_assert_eq!(&seen, &model);
            }
        }

        // Structural invariants after every step.
        let chains = sut.chain_lengths();
        prop_assert_eq!(chains.len(), sut.capacity());
        prop_assert_eq!(chains.iter().sum::<usize>(), sut.len());
        prop_assert_eq!(chains.iter().filter(|&&n| n > 0).count(), sut.filled_buckets());
        prop_assert!(sut.filled_buckets() < sut.capacity(), "a saturated table must have grown");
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: BucketTable behaves like std::collections::HashSet under random
// insert/delete/contains/clear sequences, with bookkeeping invariants:
// - chain lengths sum to len, and non-empty chains equal the filled count;
// - the filled count never reaches capacity once an insert returns;
// - the version moves exactly once per structural change.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(cap in 1usize..12, ops in arb_ops()) {
        let eq = DefaultEquality::<std::collections::hash_map::RandomState>::default();
        run_state_machine(&eq, cap, ops)?;
    }

    #[test]
    fn prop_state_machine_identity_hash(cap in 1usize..12, ops in arb_ops()) {
        let eq = from_fns(|a: &i32, b: &i32| a == b, |v: &i32| *v as i64);
        run_state_machine(&eq, cap, ops)?;
    }
}

// Property: same invariants under worst-case collisions (every value hashes
// to the same bucket), which exercises head/middle/tail splicing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(cap in 1usize..12, ops in arb_ops()) {
        let eq = from_fns(|a: &i32, b: &i32| a == b, |_: &i32| 0);
        run_state_machine(&eq, cap, ops)?;
    }
}
