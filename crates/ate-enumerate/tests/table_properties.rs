//! Property-based tests for the table enumerator

use ate_core::{ObservedTable, PotentialOutcomes};
use ate_enumerate::{enumerate_tables, is_consistent, witness_split, TableEnumerator};
use proptest::prelude::*;

fn observed_strategy() -> impl Strategy<Value = ObservedTable> {
    (0u64..5, 0u64..5, 0u64..5, 0u64..5)
        .prop_filter("at least one subject", |(a, b, c, d)| a + b + c + d > 0)
        .prop_map(|(n11, n10, n01, n00)| ObservedTable::from_counts(n11, n10, n01, n00))
}

/// Uncapped scan of the candidate domain
fn brute_force(observed: &ObservedTable) -> Vec<PotentialOutcomes> {
    let total = observed.total();
    let mut tables = Vec::new();
    for n00 in 0..=total {
        for n01 in 0..=total - n00 {
            for n10 in 0..=total - n00 - n01 {
                let table =
                    PotentialOutcomes::from_counts(n00, n01, n10, total - n00 - n01 - n10);
                if witness_split(&table, observed).is_some() {
                    tables.push(table);
                }
            }
        }
    }
    tables
}

proptest! {
    // Property: every enumerated table has N subjects, passes the
    // consistency test and has an assignment reproducing the observation
    #[test]
    fn prop_tables_are_consistent(observed in observed_strategy()) {
        for table in TableEnumerator::new(observed) {
            prop_assert_eq!(table.total(), observed.total());
            prop_assert!(is_consistent(&table, &observed));
            let split = witness_split(&table, &observed);
            prop_assert!(split.is_some());
            prop_assert_eq!(split.unwrap().observed(), observed);
        }
    }

    // Property: the enumeration is exactly the set of tables with an
    // assignment reproducing the observation, in strictly increasing order
    #[test]
    fn prop_enumeration_is_complete(observed in observed_strategy()) {
        let tables: Vec<_> = TableEnumerator::new(observed).collect();
        prop_assert!(tables.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(tables, brute_force(&observed));
    }

    // Property: the sharp-null table is always consistent and enumerated
    #[test]
    fn prop_sharp_null_present(observed in observed_strategy()) {
        let sharp = observed.sharp_null_table();
        prop_assert!(is_consistent(&sharp, &observed));
        prop_assert!(TableEnumerator::new(observed).any(|t| t == sharp));
    }

    // Property: swapping the outcome labels maps the table set onto itself
    // with never- and always-responders exchanged
    #[test]
    fn prop_outcome_relabel(observed in observed_strategy()) {
        let relabeled = ObservedTable::from_counts(
            observed.n10(),
            observed.n11(),
            observed.n00(),
            observed.n01(),
        );
        let mut mirrored: Vec<_> = TableEnumerator::new(relabeled)
            .map(|t| PotentialOutcomes::from_counts(t.n11(), t.n10(), t.n01(), t.n00()))
            .collect();
        mirrored.sort();
        prop_assert_eq!(TableEnumerator::new(observed).collect::<Vec<_>>(), mirrored);
    }
}

#[test]
fn test_published_consistency_example() {
    // n00 = 6, n01 = 11, n10 = 10, n11 = 3
    let observed = ObservedTable::new(3, 10, 11, 6).unwrap();
    let table = PotentialOutcomes::new(5, 10, 10, 5).unwrap();
    assert!(!is_consistent(&table, &observed));
}

#[test]
fn test_published_table_counts() {
    assert_eq!(enumerate_tables(16, 1, 1, 1, 13).unwrap().count(), 99);
    assert_eq!(enumerate_tables(16, 2, 6, 8, 0).unwrap().count(), 189);
    assert_eq!(enumerate_tables(20, 6, 0, 11, 3).unwrap().count(), 336);
}
