//! Optional-rule toggles with documented defaults
//!
//! Every toggle that bends the resolution arithmetic is collected here with
//! an explanation of what it changes and where it is consulted.

use serde::{Deserialize, Serialize};

/// Optional rules in effect for a battle
///
/// These map one-to-one onto branch points in the resolution engine; the
/// defaults give the plain ruleset with no optional modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOptions {
    /// A hit that exactly equals the target number becomes a glancing blow
    ///
    /// Glancing halves per-hit damage (round down) and applies -4 to the
    /// cluster roll of multi-projectile weapons.
    pub glancing_blows: bool,

    /// A hit with margin of success >= 3 becomes a direct blow
    ///
    /// Direct blows add MoS/3 to per-hit damage and +2*(MoS/3) to the
    /// cluster roll. Only entity targets qualify; hexes and structures
    /// never take direct blows.
    pub direct_blows: bool,

    /// A miss against a target standing inside a structure applies the
    /// weapon's full nominal damage to the structure instead
    pub miss_hits_structure: bool,

    /// Battlefield-wide electromagnetic interference
    ///
    /// Applies -2 to every cluster roll while active. Represents storm or
    /// orbital conditions, not a unit-mounted system.
    pub emi: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            glancing_blows: false,
            direct_blows: false,
            miss_hits_structure: false,
            emi: false,
        }
    }
}

impl GameOptions {
    /// All optional rules switched on, used by scenario tests
    pub fn all_enabled() -> Self {
        Self {
            glancing_blows: true,
            direct_blows: true,
            miss_hits_structure: true,
            emi: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_plain_ruleset() {
        let options = GameOptions::default();
        assert!(!options.glancing_blows);
        assert!(!options.direct_blows);
        assert!(!options.miss_hits_structure);
        assert!(!options.emi);
    }
}
