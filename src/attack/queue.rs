//! Attack queue and phase driver
//!
//! Attacks are declared up front, validated against the attacker and its
//! weapon, then resolved in declaration order when a phase they care
//! about runs. Swarm continuations returned by the engine are resolved
//! immediately, before the next queued attack activates.

use crate::attack::declaration::AttackDeclaration;
use crate::attack::dispatch::select_strategy;
use crate::attack::engine::{self, ActivationOutcome, QueuedAttack, Resolution};
use crate::core::error::{FusilladeError, Result};
use crate::core::types::{AttackHandle, CombatPhase};
use crate::dice::Dice;
use crate::report::Report;
use crate::rules::RulesData;
use crate::world::World;
use tracing::debug;

/// Declared attacks awaiting resolution
#[derive(Debug, Default)]
pub struct AttackQueue {
    queued: Vec<QueuedAttack>,
    next_handle: u32,
}

impl AttackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Attacks still waiting, in resolution order
    pub fn pending(&self) -> &[QueuedAttack] {
        &self.queued
    }

    /// Validate a declaration and enqueue it
    ///
    /// The attacker and weapon slot must exist now; everything else
    /// (range, ammunition, target state) is judged at resolution time so
    /// the narration can explain what went wrong.
    pub fn declare(&mut self, world: &World, declaration: AttackDeclaration) -> Result<AttackHandle> {
        let attacker = world.unit(declaration.attacker)?;
        if !attacker.is_alive() {
            return Err(FusilladeError::InvalidDeclaration(format!(
                "{} is out of action and cannot declare attacks",
                attacker.name
            )));
        }
        let mount = attacker
            .weapon(declaration.weapon_slot)
            .ok_or(FusilladeError::WeaponNotMounted {
                unit: declaration.attacker,
                slot: declaration.weapon_slot,
            })?;

        let strategy = select_strategy(&declaration, &mount.spec);
        let handle = self.take_handle();
        debug!(
            attacker = %attacker.name,
            weapon = %mount.spec.name,
            ?strategy,
            handle = handle.0,
            "attack declared"
        );
        self.queued.push(QueuedAttack {
            handle,
            declaration,
            strategy,
            announced: false,
        });
        Ok(handle)
    }

    /// Run one phase to completion and return its narration
    ///
    /// Attacks that do not care about this phase stay queued untouched.
    /// Finished attacks leave the queue; their swarm continuations are
    /// chased to exhaustion before the next queued attack activates.
    pub fn resolve_phase(
        &mut self,
        phase: CombatPhase,
        world: &mut World,
        rules: &RulesData,
        dice: &mut Dice,
    ) -> Result<Report> {
        world.begin_phase(phase);
        let mut report = Report::new();
        let pending = std::mem::take(&mut self.queued);
        let mut kept = Vec::new();

        for mut attack in pending {
            let mut outcome =
                engine::resolve_activation(&mut attack, phase, world, rules, dice, &mut report)?;
            if outcome.resolution == Resolution::KeepQueued {
                kept.push(attack);
            }

            while let Some(continuation) = outcome.continuation.take() {
                outcome = self.resolve_continuation(continuation, phase, world, rules, dice, &mut report)?;
            }
        }

        self.queued = kept;
        Ok(report)
    }

    /// Drive every phase of a round in order, then advance the round
    pub fn resolve_round(
        &mut self,
        world: &mut World,
        rules: &RulesData,
        dice: &mut Dice,
    ) -> Result<Report> {
        let mut report = Report::new();
        for phase in CombatPhase::sequence() {
            report.extend(self.resolve_phase(phase, world, rules, dice)?);
        }
        world.end_round();
        Ok(report)
    }

    /// Drop everything still queued, reporting nothing
    pub fn clear(&mut self) {
        self.queued.clear();
    }

    fn resolve_continuation(
        &mut self,
        declaration: AttackDeclaration,
        phase: CombatPhase,
        world: &mut World,
        rules: &RulesData,
        dice: &mut Dice,
        report: &mut Report,
    ) -> Result<ActivationOutcome> {
        let strategy = {
            let attacker = world.unit(declaration.attacker)?;
            let mount = attacker
                .weapon(declaration.weapon_slot)
                .ok_or(FusilladeError::WeaponNotMounted {
                    unit: declaration.attacker,
                    slot: declaration.weapon_slot,
                })?;
            select_strategy(&declaration, &mount.spec)
        };
        let mut chained = QueuedAttack {
            handle: self.take_handle(),
            declaration,
            strategy,
            announced: false,
        };
        engine::resolve_activation(&mut chained, phase, world, rules, dice, report)
    }

    fn take_handle(&mut self) -> AttackHandle {
        let handle = AttackHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::declaration::{FiringMode, TargetRef};
    use crate::attack::strategy::ResolutionStrategy;
    use crate::catalog::WeaponSpec;
    use crate::core::config::GameOptions;
    use crate::report::ReportKind;
    use crate::world::HexCoord;

    fn arena() -> (World, RulesData) {
        let world = World::new(GameOptions::default());
        let rules = RulesData::builtin().unwrap();
        (world, rules)
    }

    #[test]
    fn test_declare_rejects_unknown_attacker() {
        let (world, _) = arena();
        let mut queue = AttackQueue::new();
        let ghost = crate::core::types::UnitId::new();
        let decl = AttackDeclaration::new(ghost, TargetRef::Hex(HexCoord::new(0, 0)), 0);
        assert!(queue.declare(&world, decl).is_err());
    }

    #[test]
    fn test_declare_rejects_missing_weapon_slot() {
        let (mut world, _) = arena();
        let shooter = world.add_unit(crate::world::Unit::trooper(
            "Shooter",
            crate::core::types::TeamId(0),
            HexCoord::new(0, 0),
        ));
        let mut queue = AttackQueue::new();
        let decl = AttackDeclaration::new(shooter, TargetRef::Hex(HexCoord::new(1, 0)), 3);
        let err = queue.declare(&world, decl);
        assert!(matches!(
            err,
            Err(FusilladeError::WeaponNotMounted { slot: 3, .. })
        ));
    }

    #[test]
    fn test_phase_gate_holds_firing_attacks_through_offboard() {
        let (mut world, rules) = arena();
        let mut dice = Dice::seeded(11);
        let shooter_id = {
            let mut unit =
                crate::world::Unit::trooper("Shooter", crate::core::types::TeamId(0), HexCoord::new(0, 0));
            unit.add_weapon(WeaponSpec::medium_laser());
            world.add_unit(unit)
        };
        let target_id = world.add_unit(crate::world::Unit::trooper(
            "Target",
            crate::core::types::TeamId(1),
            HexCoord::new(3, 0),
        ));

        let mut queue = AttackQueue::new();
        queue
            .declare(&world, AttackDeclaration::new(shooter_id, TargetRef::Unit(target_id), 0))
            .unwrap();

        let offboard = queue
            .resolve_phase(CombatPhase::Offboard, &mut world, &rules, &mut dice)
            .unwrap();
        assert!(offboard.is_empty());
        assert_eq!(queue.len(), 1);

        let firing = queue
            .resolve_phase(CombatPhase::Firing, &mut world, &rules, &mut dice)
            .unwrap();
        assert!(firing.contains_kind(ReportKind::AttackAnnounced));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_designator_resolves_in_offboard() {
        let (mut world, rules) = arena();
        let mut dice = Dice::seeded(7);
        let spotter_id = {
            let mut unit =
                crate::world::Unit::trooper("Spotter", crate::core::types::TeamId(0), HexCoord::new(0, 0));
            unit.add_weapon(WeaponSpec::tag());
            world.add_unit(unit)
        };
        let target_id = world.add_unit(crate::world::Unit::trooper(
            "Mark",
            crate::core::types::TeamId(1),
            HexCoord::new(4, 0),
        ));

        let mut queue = AttackQueue::new();
        let handle = queue
            .declare(&world, AttackDeclaration::new(spotter_id, TargetRef::Unit(target_id), 0))
            .unwrap();
        assert_eq!(queue.pending()[0].handle, handle);
        assert_eq!(queue.pending()[0].strategy, ResolutionStrategy::Designation);

        let offboard = queue
            .resolve_phase(CombatPhase::Offboard, &mut world, &rules, &mut dice)
            .unwrap();
        assert!(offboard.contains_kind(ReportKind::DesignationMarked));
        assert!(queue.is_empty());
        assert_eq!(world.designations_for(target_id).count(), 1);
    }

    #[test]
    fn test_resolution_follows_declaration_order() {
        let (mut world, rules) = arena();
        let mut dice = Dice::seeded(3);
        let mut ids = Vec::new();
        for name in ["First", "Second"] {
            let mut unit =
                crate::world::Unit::trooper(name, crate::core::types::TeamId(0), HexCoord::new(0, 0));
            unit.add_weapon(WeaponSpec::medium_laser());
            ids.push(world.add_unit(unit));
        }
        let target_id = world.add_unit(crate::world::Unit::trooper(
            "Target",
            crate::core::types::TeamId(1),
            HexCoord::new(2, 0),
        ));

        let mut queue = AttackQueue::new();
        for &id in &ids {
            queue
                .declare(&world, AttackDeclaration::new(id, TargetRef::Unit(target_id), 0))
                .unwrap();
        }

        let report = queue
            .resolve_phase(CombatPhase::Firing, &mut world, &rules, &mut dice)
            .unwrap();
        let announcements: Vec<_> = report.of_kind(ReportKind::AttackAnnounced).collect();
        assert_eq!(announcements.len(), 2);
        assert!(announcements[0].text.starts_with("First"));
        assert!(announcements[1].text.starts_with("Second"));
    }

    #[test]
    fn test_dual_mode_designation_records_priority_two() {
        let (mut world, rules) = arena();
        let mut dice = Dice::seeded(5);
        let spotter_id = {
            let mut unit =
                crate::world::Unit::trooper("Spotter", crate::core::types::TeamId(0), HexCoord::new(0, 0));
            unit.add_weapon(WeaponSpec::tag());
            world.add_unit(unit)
        };
        let target_id = world.add_unit(crate::world::Unit::trooper(
            "Mark",
            crate::core::types::TeamId(1),
            HexCoord::new(3, 0),
        ));

        let mut queue = AttackQueue::new();
        queue
            .declare(
                &world,
                AttackDeclaration::new(spotter_id, TargetRef::Unit(target_id), 0)
                    .with_mode(FiringMode::Dual),
            )
            .unwrap();
        queue
            .resolve_phase(CombatPhase::Offboard, &mut world, &rules, &mut dice)
            .unwrap();

        let recorded: Vec<_> = world.designations_for(target_id).collect();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].priority, 2);
    }
}
