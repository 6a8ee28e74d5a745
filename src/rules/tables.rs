//! Cluster hit-count and jam threshold tables

use crate::dice::{Dice, Roll2d6};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Lowest meaningful 2d6 result on the cluster table
pub const CLUSTER_ROLL_MIN: u8 = 2;
/// Highest meaningful 2d6 result on the cluster table
pub const CLUSTER_ROLL_MAX: u8 = 12;

/// One row of the cluster table: hit counts for rolls 2 through 12
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRow {
    pub rack: u8,
    /// Indexed by roll - 2, so hits[0] is the result for a roll of 2
    pub hits: Vec<u8>,
}

/// Maps (rack size, modified 2d6 roll) to the number of projectiles that hit
///
/// Rack sizes without a row of their own fall back to the largest defined
/// row at or below them, with the result capped at the actual rack size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterTable {
    rows: AHashMap<u8, ClusterRow>,
}

impl ClusterTable {
    pub fn new(rows: Vec<ClusterRow>) -> Self {
        let rows = rows.into_iter().map(|r| (r.rack, r)).collect();
        Self { rows }
    }

    pub fn rack_sizes(&self) -> Vec<u8> {
        let mut sizes: Vec<u8> = self.rows.keys().copied().collect();
        sizes.sort_unstable();
        sizes
    }

    /// Number of projectiles hitting for a modified roll against a rack
    ///
    /// The roll is clamped to the 2..=12 column range before lookup, so
    /// modifiers can push the effective roll off either end of the table
    /// without leaving it.
    pub fn hits(&self, rack: u8, modified_roll: i32) -> u8 {
        if rack <= 1 {
            return rack;
        }
        let roll = modified_roll.clamp(CLUSTER_ROLL_MIN as i32, CLUSTER_ROLL_MAX as i32) as u8;
        let index = usize::from(roll - CLUSTER_ROLL_MIN);

        match self.row_for(rack) {
            Some(row) => row.hits.get(index).copied().unwrap_or(rack).min(rack),
            // No row at or below this rack: treat the whole rack as hitting
            None => rack,
        }
    }

    /// Roll 2d6, apply a modifier, and look up the hit count
    ///
    /// Returns the unmodified roll (for reporting) alongside the count.
    pub fn missiles_hit(&self, dice: &mut Dice, rack: u8, modifier: i32) -> (Roll2d6, u8) {
        let roll = dice.roll_2d6();
        let count = self.hits(rack, i32::from(roll.total) + modifier);
        (roll, count)
    }

    fn row_for(&self, rack: u8) -> Option<&ClusterRow> {
        if let Some(row) = self.rows.get(&rack) {
            return Some(row);
        }
        self.rows
            .values()
            .filter(|r| r.rack < rack)
            .max_by_key(|r| r.rack)
    }

    /// Consistency checks applied after loading
    ///
    /// Each row must cover rolls 2..=12, hit counts must stay within
    /// 1..=rack, and must never decrease as the roll improves.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.rows.is_empty() {
            return Err("cluster table has no rows".into());
        }
        for row in self.rows.values() {
            let expected = usize::from(CLUSTER_ROLL_MAX - CLUSTER_ROLL_MIN + 1);
            if row.hits.len() != expected {
                return Err(format!(
                    "rack {} row has {} columns, expected {}",
                    row.rack,
                    row.hits.len(),
                    expected
                ));
            }
            for (i, &hits) in row.hits.iter().enumerate() {
                if hits == 0 || hits > row.rack {
                    return Err(format!(
                        "rack {} roll {}: {} hits outside 1..={}",
                        row.rack,
                        i as u8 + CLUSTER_ROLL_MIN,
                        hits,
                        row.rack
                    ));
                }
                if i > 0 && hits < row.hits[i - 1] {
                    return Err(format!(
                        "rack {} hit counts decrease at roll {}",
                        row.rack,
                        i as u8 + CLUSTER_ROLL_MIN
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Jam thresholds for rapid-fire weapons, by shots fired
///
/// A rapid-fire weapon jams when its to-hit roll comes up at or below the
/// threshold for the number of shots attempted. Firing a single shot never
/// jams (threshold 0 is below any 2d6 result).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JamTable {
    thresholds: AHashMap<u8, u8>,
}

impl JamTable {
    pub fn new(thresholds: Vec<(u8, u8)>) -> Self {
        Self {
            thresholds: thresholds.into_iter().collect(),
        }
    }

    /// Roll at or below which this many shots jam the weapon
    ///
    /// Shot counts beyond the table fall back to the highest defined
    /// threshold.
    pub fn threshold(&self, shots: u8) -> u8 {
        if let Some(&t) = self.thresholds.get(&shots) {
            return t;
        }
        self.thresholds
            .iter()
            .filter(|(&s, _)| s < shots)
            .max_by_key(|(&s, _)| s)
            .map(|(_, &t)| t)
            .unwrap_or(0)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.thresholds.is_empty() {
            return Err("jam table has no entries".into());
        }
        let mut entries: Vec<(u8, u8)> = self.thresholds.iter().map(|(&s, &t)| (s, t)).collect();
        entries.sort_unstable();
        for window in entries.windows(2) {
            if window[1].1 < window[0].1 {
                return Err(format!(
                    "jam threshold decreases from {} shots to {} shots",
                    window[0].0, window[1].0
                ));
            }
        }
        for &(shots, threshold) in &entries {
            if threshold > 12 {
                return Err(format!(
                    "jam threshold {} for {} shots exceeds a 2d6 roll",
                    threshold, shots
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::loader::RulesData;

    #[test]
    fn test_cluster_lookup_exact_rack() {
        let rules = RulesData::builtin().unwrap();
        // LRM-20 on a roll of 7 lands 12 missiles
        assert_eq!(rules.cluster.hits(20, 7), 12);
        // and all 20 on a natural 12
        assert_eq!(rules.cluster.hits(20, 12), 20);
        assert_eq!(rules.cluster.hits(2, 2), 1);
    }

    #[test]
    fn test_cluster_roll_clamped_to_table_range() {
        let rules = RulesData::builtin().unwrap();
        assert_eq!(rules.cluster.hits(10, -3), rules.cluster.hits(10, 2));
        assert_eq!(rules.cluster.hits(10, 19), rules.cluster.hits(10, 12));
    }

    #[test]
    fn test_cluster_undefined_rack_falls_back() {
        let rules = RulesData::builtin().unwrap();
        // Rack 11 has no row: uses rack 10, capped at 11
        let eleven = rules.cluster.hits(11, 7);
        let ten = rules.cluster.hits(10, 7);
        assert_eq!(eleven, ten.min(11));
        // Rack 1 short-circuits
        assert_eq!(rules.cluster.hits(1, 12), 1);
        assert_eq!(rules.cluster.hits(0, 7), 0);
    }

    #[test]
    fn test_cluster_validation_rejects_bad_rows() {
        let too_short = ClusterTable::new(vec![ClusterRow {
            rack: 4,
            hits: vec![1, 2, 3],
        }]);
        assert!(too_short.validate().is_err());

        let over_rack = ClusterTable::new(vec![ClusterRow {
            rack: 4,
            hits: vec![1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 5],
        }]);
        assert!(over_rack.validate().is_err());

        let decreasing = ClusterTable::new(vec![ClusterRow {
            rack: 4,
            hits: vec![1, 2, 2, 3, 2, 3, 3, 3, 3, 4, 4],
        }]);
        assert!(decreasing.validate().is_err());
    }

    #[test]
    fn test_missiles_hit_applies_modifier() {
        let rules = RulesData::builtin().unwrap();
        let mut dice = Dice::scripted(vec![3, 4]);
        let (roll, count) = rules.cluster.missiles_hit(&mut dice, 10, 2);
        assert_eq!(roll.total, 7);
        // Modified roll of 9 against rack 10
        assert_eq!(count, rules.cluster.hits(10, 9));
    }

    #[test]
    fn test_jam_thresholds() {
        let rules = RulesData::builtin().unwrap();
        // Single shot can never jam
        assert_eq!(rules.jam.threshold(1), 0);
        // Six shots jam on a roll of 4 or less
        assert_eq!(rules.jam.threshold(6), 4);
        // Beyond the table, the worst threshold applies
        assert_eq!(rules.jam.threshold(9), 4);
    }
}
