//! Property checks for the rule tables
//!
//! The cluster and jam tables are loaded from data, so these hold for
//! any table that passes validation, not just the builtin copy.

use fusillade::dice::Dice;
use fusillade::rules::RulesData;
use proptest::prelude::*;

fn builtin() -> RulesData {
    RulesData::builtin().unwrap()
}

proptest! {
    #[test]
    fn test_cluster_hits_stay_within_rack(rack in 0u8..=40, roll in -20i32..=30) {
        let rules = builtin();
        let hits = rules.cluster.hits(rack, roll);
        prop_assert!(hits <= rack);
        if rack >= 1 {
            prop_assert!(hits >= 1);
        }
    }

    #[test]
    fn test_cluster_hits_never_decrease_as_rolls_improve(rack in 2u8..=40, roll in -20i32..=29) {
        let rules = builtin();
        prop_assert!(rules.cluster.hits(rack, roll) <= rules.cluster.hits(rack, roll + 1));
    }

    #[test]
    fn test_cluster_fallback_matches_nearest_row(rack in 2u8..=40, roll in 2i32..=12) {
        let rules = builtin();
        let nearest = rules
            .cluster
            .rack_sizes()
            .into_iter()
            .filter(|&r| r <= rack)
            .max();
        if let Some(row_rack) = nearest {
            let expected = rules.cluster.hits(row_rack, roll).min(rack);
            prop_assert_eq!(rules.cluster.hits(rack, roll), expected);
        }
    }

    #[test]
    fn test_missiles_hit_agrees_with_direct_lookup(
        a in 1u8..=6,
        b in 1u8..=6,
        rack in 2u8..=40,
        modifier in -8i32..=8,
    ) {
        let rules = builtin();
        let mut dice = Dice::scripted(vec![a, b]);
        let (roll, count) = rules.cluster.missiles_hit(&mut dice, rack, modifier);
        prop_assert_eq!(roll.total, a + b);
        prop_assert_eq!(count, rules.cluster.hits(rack, i32::from(roll.total) + modifier));
    }

    #[test]
    fn test_jam_thresholds_never_decrease_with_burst_size(shots in 1u8..=19) {
        let rules = builtin();
        prop_assert!(rules.jam.threshold(shots) <= rules.jam.threshold(shots + 1));
    }

    #[test]
    fn test_jam_threshold_stays_rollable(shots in 0u8..=40) {
        let rules = builtin();
        prop_assert!(rules.jam.threshold(shots) <= 12);
    }
}

#[test]
fn test_single_shot_never_jams() {
    let rules = builtin();
    // Threshold 0 sits below any 2d6 result
    assert_eq!(rules.jam.threshold(1), 0);
}
