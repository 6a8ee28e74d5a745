//! To-hit evaluation
//!
//! Produces the four-way outcome for a declared attack: a rollable
//! target number, an automatic result that skips the dice, or an
//! impossibility that aborts the attack before any resource is spent.
//! The modifier breakdown is kept so the report can show its work.

use crate::attack::declaration::{AttackDeclaration, FiringMode, TargetRef};
use crate::catalog::RangeBand;
use crate::world::{HexCoord, World};
use serde::{Deserialize, Serialize};

/// Outcome of to-hit evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToHit {
    /// Roll 2d6 against this target number
    Target(i32),
    /// Dice skipped; the attack connects
    AutomaticSuccess,
    /// Dice skipped; the shot is fired but cannot connect
    AutomaticFail(String),
    /// The attack cannot occur at all; nothing is spent
    Impossible(String),
}

impl ToHit {
    pub fn target_number(&self) -> Option<i32> {
        match self {
            ToHit::Target(tn) => Some(*tn),
            _ => None,
        }
    }

    pub fn is_impossible(&self) -> bool {
        matches!(self, ToHit::Impossible(_))
    }
}

/// Margin of success: roll against the effective target number, which
/// is never below the minimum 2d6 result
pub fn margin_of_success(roll_total: u8, target_number: i32) -> i32 {
    i32::from(roll_total) - target_number.max(2)
}

/// To-hit outcome plus the geometry and arithmetic behind it
#[derive(Debug, Clone)]
pub struct ToHitEvaluation {
    pub outcome: ToHit,
    pub distance: u32,
    pub band: Option<RangeBand>,
    /// Labelled modifier terms summing to the target number
    pub breakdown: Vec<(String, i32)>,
}

impl ToHitEvaluation {
    fn impossible(reason: impl Into<String>) -> Self {
        Self {
            outcome: ToHit::Impossible(reason.into()),
            distance: 0,
            band: None,
            breakdown: Vec::new(),
        }
    }

    /// Modifier terms rendered for the report
    pub fn describe(&self) -> String {
        let terms: Vec<String> = self
            .breakdown
            .iter()
            .map(|(label, value)| {
                if *value >= 0 {
                    format!("{} +{}", label, value)
                } else {
                    format!("{} {}", label, value)
                }
            })
            .collect();
        terms.join(", ")
    }
}

/// Evaluate the to-hit outcome for a declaration
pub fn evaluate(world: &World, decl: &AttackDeclaration) -> ToHitEvaluation {
    let Some(attacker) = world.get_unit(decl.attacker) else {
        return ToHitEvaluation::impossible("attacker no longer exists");
    };
    if !attacker.is_alive() {
        return ToHitEvaluation::impossible("attacker is out of action");
    }

    let Some(mount) = attacker.weapon(decl.weapon_slot) else {
        return ToHitEvaluation::impossible("no weapon in that slot");
    };
    if mount.destroyed {
        return ToHitEvaluation::impossible(format!("{} is destroyed", mount.spec.name));
    }
    if mount.jammed {
        return ToHitEvaluation::impossible(format!("{} is jammed", mount.spec.name));
    }
    if mount.uses_ammo()
        && !decl.is_continuation()
        && mount.rounds_available(decl.munition) == 0
    {
        return ToHitEvaluation::impossible(format!(
            "no {} ammunition remains for {}",
            decl.munition, mount.spec.name
        ));
    }

    let target_pos: HexCoord = match decl.target {
        TargetRef::Unit(id) => match world.get_unit(id) {
            Some(unit) if unit.is_alive() => unit.position,
            Some(_) => return ToHitEvaluation::impossible("target has already been destroyed"),
            None => return ToHitEvaluation::impossible("target no longer exists"),
        },
        ref static_ref => match static_ref.static_coord() {
            Some(coord) => coord,
            None => return ToHitEvaluation::impossible("malformed target"),
        },
    };

    if matches!(decl.target, TargetRef::HexIgnite(_)) && mount.spec.fire_tn.is_none() {
        return ToHitEvaluation::impossible(format!(
            "{} cannot start fires",
            mount.spec.name
        ));
    }

    let distance = attacker.position.distance(&target_pos);
    let Some(band) = mount.spec.ranges.band(distance) else {
        return ToHitEvaluation::impossible(format!(
            "target out of range ({} hexes, maximum {})",
            distance, mount.spec.ranges.long
        ));
    };

    // Point-blank fire at terrain cannot miss
    if decl.target.is_static() && distance <= 1 {
        return ToHitEvaluation {
            outcome: ToHit::AutomaticSuccess,
            distance,
            band: Some(band),
            breakdown: Vec::new(),
        };
    }

    let mut breakdown: Vec<(String, i32)> = Vec::new();
    breakdown.push(("gunnery".into(), i32::from(attacker.gunnery)));

    let band_label = match band {
        RangeBand::Short => "short range",
        RangeBand::Medium => "medium range",
        RangeBand::Long => "long range",
    };
    breakdown.push((band_label.into(), band.to_hit_modifier()));

    let min_penalty = mount.spec.ranges.minimum_range_penalty(distance);
    if min_penalty > 0 {
        breakdown.push(("minimum range".into(), min_penalty));
    }

    if decl.mode == FiringMode::Indirect {
        breakdown.push(("indirect fire".into(), 1));
    }

    match decl.target {
        TargetRef::Unit(id) => {
            // Lookup cannot fail: position was resolved above
            if let Some(target) = world.get_unit(id) {
                if target.immobile {
                    breakdown.push(("immobile target".into(), -4));
                }
                if target.stealth_active {
                    match band {
                        RangeBand::Short => {}
                        RangeBand::Medium => breakdown.push(("stealth armor".into(), 1)),
                        RangeBand::Long => breakdown.push(("stealth armor".into(), 2)),
                    }
                }
                let hex = world.board.hex(target.position);
                if hex.woods_level > 0 {
                    breakdown.push(("woods cover".into(), i32::from(hex.woods_level)));
                }
                if hex.smoke {
                    breakdown.push(("smoke".into(), 1));
                }
            }
        }
        _ => {
            breakdown.push(("static target".into(), -4));
        }
    }

    let total: i32 = breakdown.iter().map(|(_, v)| v).sum();
    let outcome = if total > 12 {
        ToHit::AutomaticFail(format!("needs {}, beyond what dice can roll", total))
    } else {
        ToHit::Target(total)
    };

    ToHitEvaluation {
        outcome,
        distance,
        band: Some(band),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Munition, WeaponSpec};
    use crate::core::config::GameOptions;
    use crate::core::types::TeamId;
    use crate::world::{Hex, Unit};

    fn world_with_pair(distance: i32) -> (World, crate::core::types::UnitId, crate::core::types::UnitId) {
        let mut world = World::new(GameOptions::default());
        let mut shooter = Unit::trooper("Shooter", TeamId(1), HexCoord::new(0, 0));
        shooter.add_weapon(WeaponSpec::medium_laser());
        let a = world.add_unit(shooter);
        let b = world.add_unit(Unit::trooper("Mark", TeamId(2), HexCoord::new(distance, 0)));
        (world, a, b)
    }

    #[test]
    fn test_basic_target_number() {
        let (world, a, b) = world_with_pair(5);
        let eval = evaluate(&world, &AttackDeclaration::new(a, TargetRef::Unit(b), 0));
        // Gunnery 4 + medium range 2
        assert_eq!(eval.outcome, ToHit::Target(6));
        assert_eq!(eval.band, Some(RangeBand::Medium));
        assert_eq!(eval.distance, 5);
    }

    #[test]
    fn test_out_of_range_is_impossible() {
        let (world, a, b) = world_with_pair(10);
        let eval = evaluate(&world, &AttackDeclaration::new(a, TargetRef::Unit(b), 0));
        assert!(eval.outcome.is_impossible());
    }

    #[test]
    fn test_destroyed_target_is_impossible() {
        let (mut world, a, b) = world_with_pair(4);
        world.unit_mut(b).unwrap().destroyed = true;
        let eval = evaluate(&world, &AttackDeclaration::new(a, TargetRef::Unit(b), 0));
        assert!(eval.outcome.is_impossible());
    }

    #[test]
    fn test_cover_and_state_modifiers() {
        let (mut world, a, b) = world_with_pair(5);
        {
            let target_pos = world.unit(b).unwrap().position;
            world.board.set_hex(target_pos, Hex::woods(2));
            let target = world.unit_mut(b).unwrap();
            target.immobile = true;
            target.stealth_active = true;
        }
        let eval = evaluate(&world, &AttackDeclaration::new(a, TargetRef::Unit(b), 0));
        // 4 gunnery + 2 medium + 1 stealth + 2 woods - 4 immobile
        assert_eq!(eval.outcome, ToHit::Target(5));
    }

    #[test]
    fn test_minimum_range_applies() {
        let mut world = World::new(GameOptions::default());
        let mut shooter = Unit::trooper("Archer", TeamId(1), HexCoord::new(0, 0));
        shooter.add_weapon_with_ammo(WeaponSpec::lrm_20(), Munition::Standard, 12);
        let a = world.add_unit(shooter);
        let b = world.add_unit(Unit::trooper("Close", TeamId(2), HexCoord::new(4, 0)));

        let eval = evaluate(&world, &AttackDeclaration::new(a, TargetRef::Unit(b), 0));
        // 4 gunnery + 0 short + (6 - 4 + 1) minimum range
        assert_eq!(eval.outcome, ToHit::Target(7));
    }

    #[test]
    fn test_unrollable_total_is_automatic_fail() {
        let (mut world, a, b) = world_with_pair(9);
        {
            let target_pos = world.unit(b).unwrap().position;
            let mut hex = Hex::woods(3);
            hex.smoke = true;
            world.board.set_hex(target_pos, hex);
            world.unit_mut(b).unwrap().stealth_active = true;
        }
        let eval = evaluate(&world, &AttackDeclaration::new(a, TargetRef::Unit(b), 0));
        // 4 + 4 long + 2 stealth + 3 woods + 1 smoke = 14
        assert!(matches!(eval.outcome, ToHit::AutomaticFail(_)));
    }

    #[test]
    fn test_point_blank_static_is_automatic() {
        let mut world = World::new(GameOptions::default());
        let mut shooter = Unit::trooper("Sapper", TeamId(1), HexCoord::new(0, 0));
        shooter.add_weapon(WeaponSpec::medium_laser());
        let a = world.add_unit(shooter);

        let decl =
            AttackDeclaration::new(a, TargetRef::MinefieldClear(HexCoord::new(1, 0)), 0);
        let eval = evaluate(&world, &decl);
        assert_eq!(eval.outcome, ToHit::AutomaticSuccess);
    }

    #[test]
    fn test_empty_bins_are_impossible_but_continuations_skip_ammo() {
        let mut world = World::new(GameOptions::default());
        let mut shooter = Unit::trooper("Swarmer", TeamId(1), HexCoord::new(0, 0));
        shooter.add_weapon_with_ammo(WeaponSpec::lrm_10(), Munition::Swarm, 0);
        let a = world.add_unit(shooter);
        let b = world.add_unit(Unit::trooper("Mark", TeamId(2), HexCoord::new(8, 0)));

        let dry = AttackDeclaration::new(a, TargetRef::Unit(b), 0)
            .with_munition(Munition::Swarm);
        assert!(evaluate(&world, &dry).outcome.is_impossible());

        let mut continuation = dry.clone();
        continuation.missiles_carried = Some(6);
        continuation.prior_target = Some(b);
        assert!(!evaluate(&world, &continuation).outcome.is_impossible());
    }

    #[test]
    fn test_margin_of_success_floors_target_at_two() {
        assert_eq!(margin_of_success(7, 4), 3);
        assert_eq!(margin_of_success(7, -1), 5);
        assert_eq!(margin_of_success(2, 8), -6);
    }
}
