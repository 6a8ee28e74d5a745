//! Weapon records
//!
//! A weapon is described by its family (which picks the resolution
//! strategy), rack and cluster sizes, range brackets, heat, and a damage
//! profile. Values here are data: the engine never special-cases a
//! weapon by name.

use crate::dice::Dice;
use serde::{Deserialize, Serialize};

/// Weapon family - determines which resolution strategy fires it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponFamily {
    /// Direct-fire energy weapons (lasers, flamers)
    Energy,
    /// Direct-fire single-slug ballistics (standard autocannon)
    Ballistic,
    /// Ballistics that scatter submunitions over the cluster table
    /// (LB-X shot, hyper-velocity gauss)
    ClusterBallistic,
    /// Missile racks resolved on the cluster table (LRM, SRM)
    MissileRack,
    /// Machine guns; burst-capable, jam when pushed
    MachineGun,
    /// Rotary autocannon with a selectable burst of 1 to 6 shots
    RotaryCannon,
    /// Ultra autocannon; double-rate fire, destroyed on a jam
    UltraCannon,
    /// Indirect-capable mortar tubes resolved on the cluster table
    Mortar,
    /// Launchers delivering attachable pods (Narc and kin)
    PodLauncher,
    /// Target designators (TAG); mark rather than damage
    Designator,
}

/// How much damage one connecting hit deals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageProfile {
    /// Same damage at any range
    Fixed(u32),
    /// Damage falls off by range bracket
    ByRange { short: u32, medium: u32, long: u32 },
    /// Each projectile of the rack deals this much
    PerMissile(u32),
    /// Re-rolled per connecting hit (d6 count)
    Rolled { dice: u8 },
}

impl DamageProfile {
    /// Damage for a single connecting hit at the given bracket
    pub fn per_hit(&self, dice: &mut Dice, band: RangeBand) -> u32 {
        match *self {
            DamageProfile::Fixed(n) => n,
            DamageProfile::ByRange {
                short,
                medium,
                long,
            } => match band {
                RangeBand::Short => short,
                RangeBand::Medium => medium,
                RangeBand::Long => long,
            },
            DamageProfile::PerMissile(n) => n,
            DamageProfile::Rolled { dice: count } => dice.d6_sum(count),
        }
    }

    /// Full-volley damage, as used when a miss still strikes a structure
    pub fn volley_total(&self, dice: &mut Dice, band: RangeBand, rack: u8) -> u32 {
        match *self {
            DamageProfile::Fixed(_) | DamageProfile::ByRange { .. } => self.per_hit(dice, band),
            DamageProfile::PerMissile(n) => n * u32::from(rack.max(1)),
            DamageProfile::Rolled { .. } => self.per_hit(dice, band) * u32::from(rack.max(1)),
        }
    }
}

/// Range bracket an attack falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeBand {
    Short,
    Medium,
    Long,
}

impl RangeBand {
    /// To-hit modifier for firing into this bracket
    pub fn to_hit_modifier(self) -> i32 {
        match self {
            RangeBand::Short => 0,
            RangeBand::Medium => 2,
            RangeBand::Long => 4,
        }
    }

    fn index(self) -> usize {
        match self {
            RangeBand::Short => 0,
            RangeBand::Medium => 1,
            RangeBand::Long => 2,
        }
    }
}

/// Range brackets in hexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBrackets {
    /// Inside this range the weapon fights its own arc; each hex of
    /// shortfall adds +1 to hit
    pub minimum: Option<u8>,
    pub short: u8,
    pub medium: u8,
    pub long: u8,
}

impl RangeBrackets {
    pub fn new(minimum: Option<u8>, short: u8, medium: u8, long: u8) -> Self {
        Self {
            minimum,
            short,
            medium,
            long,
        }
    }

    /// Bracket for a target at this distance, or None when out of range
    pub fn band(&self, distance: u32) -> Option<RangeBand> {
        if distance <= u32::from(self.short) {
            Some(RangeBand::Short)
        } else if distance <= u32::from(self.medium) {
            Some(RangeBand::Medium)
        } else if distance <= u32::from(self.long) {
            Some(RangeBand::Long)
        } else {
            None
        }
    }

    /// Extra to-hit penalty for firing inside minimum range
    pub fn minimum_range_penalty(&self, distance: u32) -> i32 {
        match self.minimum {
            Some(min) if distance <= u32::from(min) => {
                i32::from(min) - distance as i32 + 1
            }
            _ => 0,
        }
    }
}

/// Complete weapon record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub family: WeaponFamily,
    /// Projectiles per activation (1 for single-shot weapons)
    pub rack_size: u8,
    /// Projectiles grouped into one damage application
    pub cluster_size: u8,
    pub damage: DamageProfile,
    /// Heat per activation; per shot for burst-fire families
    pub heat: u8,
    /// 2d6 target to set terrain alight; None means the weapon cannot
    /// start fires
    pub fire_tn: Option<u8>,
    pub ranges: RangeBrackets,
    /// Cluster-roll modifier by bracket (short, medium, long)
    pub cluster_range_mod: [i32; 3],
    /// Capital-scale damage bypasses woods absorption
    pub capital: bool,
}

impl WeaponSpec {
    /// Whether this weapon resolves its hit count on the cluster table
    pub fn rolls_on_cluster_table(&self) -> bool {
        matches!(
            self.family,
            WeaponFamily::ClusterBallistic | WeaponFamily::MissileRack | WeaponFamily::Mortar
        ) && self.rack_size > 1
    }

    /// Whether this weapon can select a burst size and jam
    pub fn is_rapid_fire(&self) -> bool {
        matches!(
            self.family,
            WeaponFamily::MachineGun | WeaponFamily::RotaryCannon | WeaponFamily::UltraCannon
        )
    }

    /// Cluster-roll modifier for the bracket the shot was fired at
    pub fn cluster_modifier_at(&self, band: RangeBand) -> i32 {
        self.cluster_range_mod[band.index()]
    }

    /// Canned weapon: Medium Laser
    pub fn medium_laser() -> Self {
        Self {
            name: "Medium Laser".into(),
            family: WeaponFamily::Energy,
            rack_size: 1,
            cluster_size: 1,
            damage: DamageProfile::Fixed(5),
            heat: 3,
            fire_tn: Some(7),
            ranges: RangeBrackets::new(None, 3, 6, 9),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Flamer (Heat mode pours heat into the target)
    pub fn flamer() -> Self {
        Self {
            name: "Flamer".into(),
            family: WeaponFamily::Energy,
            rack_size: 1,
            cluster_size: 1,
            damage: DamageProfile::Fixed(2),
            heat: 3,
            fire_tn: Some(4),
            ranges: RangeBrackets::new(None, 1, 2, 3),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Autocannon/10
    pub fn autocannon_10() -> Self {
        Self {
            name: "Autocannon/10".into(),
            family: WeaponFamily::Ballistic,
            rack_size: 1,
            cluster_size: 1,
            damage: DamageProfile::Fixed(10),
            heat: 3,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 5, 10, 15),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: LB 10-X firing cluster shot
    pub fn lb10x_cluster() -> Self {
        Self {
            name: "LB 10-X AC (Cluster)".into(),
            family: WeaponFamily::ClusterBallistic,
            rack_size: 10,
            cluster_size: 1,
            damage: DamageProfile::PerMissile(1),
            heat: 2,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 6, 12, 18),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: LRM-10
    pub fn lrm_10() -> Self {
        Self {
            name: "LRM-10".into(),
            family: WeaponFamily::MissileRack,
            rack_size: 10,
            cluster_size: 5,
            damage: DamageProfile::PerMissile(1),
            heat: 4,
            fire_tn: None,
            ranges: RangeBrackets::new(Some(6), 7, 14, 21),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: LRM-20
    pub fn lrm_20() -> Self {
        Self {
            name: "LRM-20".into(),
            family: WeaponFamily::MissileRack,
            rack_size: 20,
            cluster_size: 5,
            damage: DamageProfile::PerMissile(1),
            heat: 6,
            fire_tn: None,
            ranges: RangeBrackets::new(Some(6), 7, 14, 21),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: SRM-6
    pub fn srm_6() -> Self {
        Self {
            name: "SRM-6".into(),
            family: WeaponFamily::MissileRack,
            rack_size: 6,
            cluster_size: 1,
            damage: DamageProfile::PerMissile(2),
            heat: 4,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 3, 6, 9),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Machine Gun (bursts up to 3 shots)
    pub fn machine_gun() -> Self {
        Self {
            name: "Machine Gun".into(),
            family: WeaponFamily::MachineGun,
            rack_size: 3,
            cluster_size: 1,
            damage: DamageProfile::Fixed(2),
            heat: 0,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 1, 2, 3),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Rotary AC/5 (bursts up to 6 shots)
    pub fn rotary_ac_5() -> Self {
        Self {
            name: "Rotary AC/5".into(),
            family: WeaponFamily::RotaryCannon,
            rack_size: 6,
            cluster_size: 1,
            damage: DamageProfile::Fixed(5),
            heat: 1,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 6, 12, 18),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Ultra AC/5 (fires 2 shots in Ultra mode)
    pub fn ultra_ac_5() -> Self {
        Self {
            name: "Ultra AC/5".into(),
            family: WeaponFamily::UltraCannon,
            rack_size: 2,
            cluster_size: 1,
            damage: DamageProfile::Fixed(5),
            heat: 1,
            fire_tn: None,
            ranges: RangeBrackets::new(Some(2), 6, 13, 20),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Mech Mortar/8
    pub fn mortar_8() -> Self {
        Self {
            name: "Mech Mortar/8".into(),
            family: WeaponFamily::Mortar,
            rack_size: 8,
            cluster_size: 1,
            damage: DamageProfile::PerMissile(2),
            heat: 10,
            fire_tn: Some(9),
            ranges: RangeBrackets::new(Some(6), 7, 14, 21),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: Hyper-Assault Gauss 20
    pub fn hag_20() -> Self {
        Self {
            name: "HAG/20".into(),
            family: WeaponFamily::ClusterBallistic,
            rack_size: 20,
            cluster_size: 5,
            damage: DamageProfile::PerMissile(1),
            heat: 4,
            fire_tn: None,
            ranges: RangeBrackets::new(Some(2), 8, 16, 24),
            cluster_range_mod: [2, 0, -2],
            capital: false,
        }
    }

    /// Canned weapon: Narc Missile Beacon launcher
    pub fn narc_launcher() -> Self {
        Self {
            name: "Narc Launcher".into(),
            family: WeaponFamily::PodLauncher,
            rack_size: 1,
            cluster_size: 1,
            damage: DamageProfile::Fixed(0),
            heat: 0,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 3, 6, 9),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }

    /// Canned weapon: TAG designator
    pub fn tag() -> Self {
        Self {
            name: "TAG".into(),
            family: WeaponFamily::Designator,
            rack_size: 1,
            cluster_size: 1,
            damage: DamageProfile::Fixed(0),
            heat: 0,
            fire_tn: None,
            ranges: RangeBrackets::new(None, 5, 9, 15),
            cluster_range_mod: [0, 0, 0],
            capital: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bands() {
        let laser = WeaponSpec::medium_laser();
        assert_eq!(laser.ranges.band(3), Some(RangeBand::Short));
        assert_eq!(laser.ranges.band(4), Some(RangeBand::Medium));
        assert_eq!(laser.ranges.band(9), Some(RangeBand::Long));
        assert_eq!(laser.ranges.band(10), None);
    }

    #[test]
    fn test_minimum_range_penalty() {
        let lrm = WeaponSpec::lrm_20();
        // At 6 hexes: 6 - 6 + 1 = +1
        assert_eq!(lrm.ranges.minimum_range_penalty(6), 1);
        assert_eq!(lrm.ranges.minimum_range_penalty(2), 5);
        assert_eq!(lrm.ranges.minimum_range_penalty(7), 0);
        assert_eq!(WeaponSpec::medium_laser().ranges.minimum_range_penalty(1), 0);
    }

    #[test]
    fn test_family_predicates() {
        assert!(WeaponSpec::lrm_20().rolls_on_cluster_table());
        assert!(WeaponSpec::lb10x_cluster().rolls_on_cluster_table());
        assert!(!WeaponSpec::medium_laser().rolls_on_cluster_table());
        assert!(WeaponSpec::rotary_ac_5().is_rapid_fire());
        assert!(WeaponSpec::ultra_ac_5().is_rapid_fire());
        assert!(!WeaponSpec::lrm_20().is_rapid_fire());
    }

    #[test]
    fn test_damage_profiles() {
        let mut dice = Dice::scripted(vec![4, 5]);
        assert_eq!(
            DamageProfile::Fixed(10).per_hit(&mut dice, RangeBand::Long),
            10
        );
        let by_range = DamageProfile::ByRange {
            short: 10,
            medium: 7,
            long: 4,
        };
        assert_eq!(by_range.per_hit(&mut dice, RangeBand::Medium), 7);
        assert_eq!(
            DamageProfile::Rolled { dice: 2 }.per_hit(&mut dice, RangeBand::Short),
            9
        );
    }

    #[test]
    fn test_volley_total_scales_per_missile_weapons() {
        let mut dice = Dice::scripted(vec![3]);
        let srm = WeaponSpec::srm_6();
        assert_eq!(
            srm.damage.volley_total(&mut dice, RangeBand::Short, srm.rack_size),
            12
        );
        let ac = WeaponSpec::autocannon_10();
        assert_eq!(
            ac.damage.volley_total(&mut dice, RangeBand::Short, ac.rack_size),
            10
        );
    }

    #[test]
    fn test_hag_cluster_modifier_by_bracket() {
        let hag = WeaponSpec::hag_20();
        assert_eq!(hag.cluster_modifier_at(RangeBand::Short), 2);
        assert_eq!(hag.cluster_modifier_at(RangeBand::Medium), 0);
        assert_eq!(hag.cluster_modifier_at(RangeBand::Long), -2);
    }
}
