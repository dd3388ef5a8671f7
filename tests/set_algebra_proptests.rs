// HashedSet set-algebra property tests.
//
// Each property builds a HashedSet from a random vector (duplicates
// included), applies one operation against another random vector, and
// compares the outcome with the same operation on BTreeSet.
//  - Mutating operations: union/except/intersect/symmetric-except must leave
//    exactly the reference element set behind, with len() in agreement.
//  - Predicates: subset/superset (plain and proper), set_equals and overlaps
//    must agree with the reference relation.
//  - Both a small initial capacity (forcing growth) and the default are used.
use chain_set::{equality, HashedSet};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_values() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(-30i32..30, 0..40)
}

fn build(values: &[i32], capacity: usize) -> HashedSet<i32> {
    let mut set = HashedSet::with_capacity(capacity);
    set.union_with(values.iter().copied());
    set
}

fn reference(values: &[i32]) -> BTreeSet<i32> {
    values.iter().copied().collect()
}

fn contents(set: &HashedSet<i32>) -> BTreeSet<i32> {
    set.iter().copied().collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn prop_mutating_operations_match_reference(
        a in arb_values(),
        b in arb_values(),
        cap in 1usize..8,
    ) {
        let ra = reference(&a);
        let rb = reference(&b);

        let mut s = build(&a, cap);
        s.union_with(b.iter().copied());
        prop_assert_eq!(contents(&s), ra.union(&rb).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(s.len(), ra.union(&rb).count());

        let mut s = build(&a, cap);
        s.except_with(&b);
        prop_assert_eq!(contents(&s), ra.difference(&rb).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(s.len(), ra.difference(&rb).count());

        let mut s = build(&a, cap);
        s.intersect_with(b.iter().copied());
        prop_assert_eq!(contents(&s), ra.intersection(&rb).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(s.len(), ra.intersection(&rb).count());

        let mut s = build(&a, cap);
        s.symmetric_except_with(b.iter().copied());
        prop_assert_eq!(
            contents(&s),
            ra.symmetric_difference(&rb).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(s.len(), ra.symmetric_difference(&rb).count());
    }

    #[test]
    fn prop_predicates_match_reference(a in arb_values(), b in arb_values()) {
        let ra = reference(&a);
        let rb = reference(&b);
        let s = build(&a, chain_set::DEFAULT_CAPACITY);

        prop_assert_eq!(s.is_subset_of(b.iter().copied()), ra.is_subset(&rb));
        prop_assert_eq!(s.is_superset_of(&b), ra.is_superset(&rb));
        prop_assert_eq!(
            s.is_proper_subset_of(b.iter().copied()),
            ra.is_subset(&rb) && ra.len() < rb.len()
        );
        prop_assert_eq!(
            s.is_proper_superset_of(b.iter().copied()),
            ra.is_superset(&rb) && ra.len() > rb.len()
        );
        prop_assert_eq!(s.set_equals(b.iter().copied()), ra == rb);
        prop_assert_eq!(s.overlaps(&b), !ra.is_disjoint(&rb));
    }

    #[test]
    fn prop_relations_with_self(a in arb_values()) {
        let s = build(&a, 3);
        let own: Vec<i32> = s.iter().copied().collect();
        prop_assert!(s.set_equals(own.iter().copied()));
        prop_assert!(s.is_subset_of(own.iter().copied()));
        prop_assert!(s.is_superset_of(&own));
        prop_assert!(!s.is_proper_subset_of(own.iter().copied()));
        prop_assert!(!s.is_proper_superset_of(own.iter().copied()));
    }

    #[test]
    fn prop_custom_equality_dedups_by_class(values in arb_values()) {
        // Equal modulo 7: at most seven classes survive.
        let mod7 = equality::from_fns(
            |a: &i32, b: &i32| a.rem_euclid(7) == b.rem_euclid(7),
            |v: &i32| v.rem_euclid(7) as i64,
        );
        let s = HashedSet::from_iter_with_equality(values.iter().copied(), mod7);
        let classes: BTreeSet<i32> = values.iter().map(|v| v.rem_euclid(7)).collect();
        prop_assert_eq!(s.len(), classes.len());
        let seen: BTreeSet<i32> = s.iter().map(|v| v.rem_euclid(7)).collect();
        prop_assert_eq!(seen, classes);
    }

    #[test]
    fn prop_copy_to_reproduces_elements(values in arb_values(), pad in 0usize..4) {
        let s = build(&values, 2);
        let mut dest = vec![i32::MIN; s.len() + pad];
        prop_assert!(s.copy_to(&mut dest, pad as isize).is_ok());
        prop_assert_eq!(reference(&dest[pad..]), reference(&values));
        if !s.is_empty() {
            let mut short = vec![0; s.len() - 1];
            prop_assert!(s.copy_to(&mut short, 0).is_err());
        }
    }
}
