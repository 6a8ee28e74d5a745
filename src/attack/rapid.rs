//! Burst sizing and jam checks for rapid-fire weapons
//!
//! Rotary and ultra cannons pick a shot count at declaration time, pay
//! ammunition for every shot attempted, and risk a jam scaled to how
//! hard the action was pushed. The to-hit roll itself doubles as the
//! jam die.

use crate::attack::declaration::FiringMode;
use crate::catalog::{Munition, WeaponSpec};
use crate::rules::RulesData;
use crate::world::WeaponMount;

/// Shots per activation in plain ultra fire
const ULTRA_SHOTS: u8 = 2;

/// Shot count the declared mode asks for
pub fn requested_shots(mode: FiringMode, spec: &WeaponSpec) -> u8 {
    match mode {
        FiringMode::Ultra => ULTRA_SHOTS.min(spec.rack_size.max(1)),
        FiringMode::Rotary(n) => n.clamp(1, spec.rack_size.max(1)),
        _ => 1,
    }
}

/// Requested shots capped to what the magazines can actually feed
pub fn affordable_shots(mount: &WeaponMount, munition: Munition, requested: u8) -> u8 {
    if !mount.uses_ammo() {
        return requested;
    }
    let available = mount.rounds_available(munition);
    u32::from(requested).min(available) as u8
}

/// Whether a burst of this size jams on the given to-hit roll
pub fn jams_on_roll(rules: &RulesData, shots: u8, roll_total: u8) -> bool {
    shots >= 2 && roll_total <= rules.jam.threshold(shots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_shots_by_mode() {
        let rac = WeaponSpec::rotary_ac_5();
        assert_eq!(requested_shots(FiringMode::Rotary(6), &rac), 6);
        assert_eq!(requested_shots(FiringMode::Rotary(9), &rac), 6);
        assert_eq!(requested_shots(FiringMode::Rotary(0), &rac), 1);
        assert_eq!(requested_shots(FiringMode::Standard, &rac), 1);

        let uac = WeaponSpec::ultra_ac_5();
        assert_eq!(requested_shots(FiringMode::Ultra, &uac), 2);
    }

    #[test]
    fn test_affordable_shots_cap() {
        let mount = WeaponMount::with_ammo(WeaponSpec::rotary_ac_5(), Munition::Standard, 4);
        assert_eq!(affordable_shots(&mount, Munition::Standard, 6), 4);
        assert_eq!(affordable_shots(&mount, Munition::Standard, 2), 2);

        // Magazine-less mounts fire whatever was requested
        let energy = WeaponMount::new(WeaponSpec::medium_laser());
        assert_eq!(affordable_shots(&energy, Munition::Standard, 3), 3);
    }

    #[test]
    fn test_jam_thresholds_against_rolls() {
        let rules = RulesData::builtin().unwrap();
        // A 6-shot burst jams on anything up to 4
        assert!(jams_on_roll(&rules, 6, 3));
        assert!(jams_on_roll(&rules, 6, 4));
        assert!(!jams_on_roll(&rules, 6, 5));
        // Two shots only jam on snake eyes
        assert!(jams_on_roll(&rules, 2, 2));
        assert!(!jams_on_roll(&rules, 2, 3));
        // Single shots never jam
        assert!(!jams_on_roll(&rules, 1, 2));
    }
}
