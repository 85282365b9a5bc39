//! Property-based tests for unit table expansion

use ate_core::{expand_table, LatentClass, ObservedTable, PotentialOutcomes, UnitTable};
use proptest::prelude::*;

proptest! {
    // Property: the expansion has N rows and one block per class with the
    // exact class count
    #[test]
    fn prop_expansion_matches_counts(
        n00 in 0i64..40,
        n01 in 0i64..40,
        n10 in 0i64..40,
        n11 in 0i64..40,
    ) {
        let units = expand_table(&[n00, n01, n10, n11]).unwrap();
        let total = (n00 + n01 + n10 + n11) as usize;
        prop_assert_eq!(units.len(), total);

        let table = PotentialOutcomes::new(n00, n01, n10, n11).unwrap();
        for class in LatentClass::ALL {
            let range = units.class_range(class);
            prop_assert_eq!(range.len() as u64, table.count(class));
            for row in &units.rows()[range] {
                prop_assert_eq!(*row, class.outcomes());
            }
        }
    }

    // Property: summarizing the expansion recovers the summary table
    #[test]
    fn prop_summarize_round_trip(
        n00 in 0u64..60,
        n01 in 0u64..60,
        n10 in 0u64..60,
        n11 in 0u64..60,
    ) {
        let table = PotentialOutcomes::from_counts(n00, n01, n10, n11);
        let units = UnitTable::from_summary(&table).unwrap();
        prop_assert_eq!(units.summarize(), table);

        let recount = units.rows().iter().fold([0u64; 4], |mut acc, row| {
            acc[(row[0] * 2 + row[1]) as usize] += 1;
            acc
        });
        prop_assert_eq!(recount, table.as_array());
    }

    // Property: negative entries are always rejected
    #[test]
    fn prop_negative_rejected(
        position in 0usize..4,
        value in i64::MIN..0,
    ) {
        let mut counts = [1i64; 4];
        counts[position] = value;
        prop_assert!(expand_table(&counts).is_err());
    }
}

#[test]
fn test_serialized_shapes() {
    let observed = ObservedTable::new(1, 1, 1, 13).unwrap();
    let json = serde_json::to_value(observed).unwrap();
    assert_eq!(json["n11"], 1);
    assert_eq!(json["n00"], 13);

    let table = PotentialOutcomes::new(14, 0, 1, 1).unwrap();
    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(json, r#"{"n00":14,"n01":0,"n10":1,"n11":1}"#);
}
