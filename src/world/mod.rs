//! World state and effects sink
//!
//! `World` owns every mutable piece of the battlefield: units, terrain,
//! minefields, structures, designation records, and the optional rules
//! in force. Attack resolution never mutates battlefield state directly;
//! every effect lands through a method here.

pub mod board;
pub mod hex;
pub mod unit;

pub use board::{Board, Hex, Minefield, Structure, TerrainKind};
pub use hex::HexCoord;
pub use unit::{AmmoBin, AttachedPod, DamageResult, HitLocation, Unit, WeaponMount};

use crate::catalog::Munition;
use crate::core::config::GameOptions;
use crate::core::error::{FusilladeError, Result};
use crate::core::types::{CombatPhase, TeamId, UnitId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A target-designation record left by a designator hit (or miss)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    pub target: UnitId,
    pub team: TeamId,
    /// Dual-beam designators mark at higher priority
    pub priority: u8,
    /// A missed designation still records that the shot was spent
    pub wasted: bool,
}

/// What a hex-delivered payload did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEffect {
    MinefieldLaid { density: u8 },
    SmokeScreened,
    FireSet,
    NoEffect,
}

/// The full battlefield state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    units: AHashMap<UnitId, Unit>,
    /// Insertion order, for deterministic iteration
    unit_order: Vec<UnitId>,
    pub board: Board,
    pub options: GameOptions,
    /// Designation records consumed by semi-guided ordnance
    pub designations: Vec<Designation>,
    /// Current round number, starting at 1
    pub round: u32,
}

impl World {
    pub fn new(options: GameOptions) -> Self {
        Self {
            units: AHashMap::new(),
            unit_order: Vec::new(),
            board: Board::new(),
            options,
            designations: Vec::new(),
            round: 1,
        }
    }

    // ===== Units =====

    pub fn add_unit(&mut self, unit: Unit) -> UnitId {
        let id = unit.id;
        self.unit_order.push(id);
        self.units.insert(id, unit);
        id
    }

    /// Unit lookup for defensive re-validation; None for unknown ids
    pub fn get_unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit> {
        self.units.get(&id).ok_or(FusilladeError::UnitNotFound(id))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.units
            .get_mut(&id)
            .ok_or(FusilladeError::UnitNotFound(id))
    }

    /// Units in insertion order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.unit_order.iter().filter_map(|id| self.units.get(id))
    }

    /// Living units within `range` hexes of a coordinate, nearest first
    /// with unit id breaking ties
    pub fn living_units_near(&self, center: HexCoord, range: u32) -> Vec<&Unit> {
        let mut found: Vec<&Unit> = self
            .units()
            .filter(|u| u.is_alive() && u.position.distance(&center) <= range)
            .collect();
        found.sort_by_key(|u| (u.position.distance(&center), u.id));
        found
    }

    // ===== Effects sink =====

    /// Apply damage to a unit at a location
    pub fn apply_unit_damage(
        &mut self,
        target: UnitId,
        location: HitLocation,
        amount: u32,
    ) -> Result<DamageResult> {
        let unit = self.unit_mut(target)?;
        let result = unit.take_damage(location, amount);
        debug!(
            unit = %unit.name,
            %location,
            amount,
            destroyed = result.destroyed,
            "unit damage applied"
        );
        Ok(result)
    }

    /// Apply damage to the structure in a hex; returns the CF remaining
    pub fn apply_structure_damage(&mut self, coord: HexCoord, amount: u32) -> u32 {
        let remaining = self.board.damage_structure(coord, amount);
        debug!(%coord, amount, remaining, "structure damage applied");
        remaining
    }

    /// Set a hex alight if its foliage can burn
    pub fn ignite_hex(&mut self, coord: HexCoord) -> bool {
        let hex = self.board.hex_mut(coord);
        if hex.is_flammable() {
            hex.on_fire = true;
            debug!(%coord, "hex ignited");
            true
        } else {
            false
        }
    }

    /// Deliver an area payload into a hex
    pub fn deliver_payload(
        &mut self,
        coord: HexCoord,
        munition: Munition,
        count: u8,
    ) -> PayloadEffect {
        match munition {
            Munition::Thunder => {
                self.board.add_minefield(
                    coord,
                    Minefield {
                        clear_tn: 6,
                        density: count.max(1),
                    },
                );
                PayloadEffect::MinefieldLaid {
                    density: count.max(1),
                }
            }
            Munition::Smoke => {
                self.board.hex_mut(coord).smoke = true;
                PayloadEffect::SmokeScreened
            }
            Munition::Inferno => {
                self.board.hex_mut(coord).on_fire = true;
                PayloadEffect::FireSet
            }
            _ => PayloadEffect::NoEffect,
        }
    }

    /// Attach a pod to a unit's hull
    pub fn attach_pod(&mut self, target: UnitId, pod: AttachedPod) -> Result<()> {
        let unit = self.unit_mut(target)?;
        unit.pods.push(pod);
        debug!(unit = %unit.name, kind = %pod.kind, "pod attached");
        Ok(())
    }

    pub fn register_designation(&mut self, designation: Designation) {
        self.designations.push(designation);
    }

    /// Designation records against a target, in registration order
    pub fn designations_for(&self, target: UnitId) -> impl Iterator<Item = &Designation> {
        self.designations.iter().filter(move |d| d.target == target)
    }

    // ===== Queries =====

    /// Whether an enemy ECM bubble covers any hex along the attack line
    pub fn ecm_affects_path(&self, attacker_team: TeamId, from: HexCoord, to: HexCoord) -> bool {
        let line = from.line_to(&to);
        self.units()
            .filter(|u| u.is_alive() && u.team != attacker_team && u.ecm_radius > 0)
            .any(|u| {
                line.iter()
                    .any(|hex| u.position.distance(hex) <= u.ecm_radius)
            })
    }

    // ===== Upkeep =====

    /// Reset per-phase state at the start of a phase
    pub fn begin_phase(&mut self, phase: CombatPhase) {
        debug!(%phase, round = self.round, "phase begins");
        for unit in self.units.values_mut() {
            unit.ams_used_this_phase = false;
        }
    }

    /// End-of-round upkeep: jammed rotary mounts clear, the round
    /// counter advances
    pub fn end_round(&mut self) {
        for unit in self.units.values_mut() {
            for mount in &mut unit.weapons {
                if mount.jammed && !mount.destroyed {
                    mount.jammed = false;
                }
            }
        }
        self.round += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WeaponSpec;

    fn two_unit_world() -> (World, UnitId, UnitId) {
        let mut world = World::new(GameOptions::default());
        let a = world.add_unit(Unit::trooper("Alpha", TeamId(1), HexCoord::new(0, 0)));
        let b = world.add_unit(Unit::trooper("Bravo", TeamId(2), HexCoord::new(5, 0)));
        (world, a, b)
    }

    #[test]
    fn test_unit_lookup() {
        let (world, a, _) = two_unit_world();
        assert!(world.unit(a).is_ok());
        assert!(world.get_unit(UnitId::new()).is_none());
        assert!(matches!(
            world.unit(UnitId::new()),
            Err(FusilladeError::UnitNotFound(_))
        ));
    }

    #[test]
    fn test_living_units_near_orders_by_distance() {
        let mut world = World::new(GameOptions::default());
        let far = world.add_unit(Unit::trooper("Far", TeamId(1), HexCoord::new(2, 0)));
        let near = world.add_unit(Unit::trooper("Near", TeamId(2), HexCoord::new(1, 0)));
        let mut dead = Unit::trooper("Dead", TeamId(2), HexCoord::new(0, 0));
        dead.destroyed = true;
        world.add_unit(dead);

        let found = world.living_units_near(HexCoord::new(0, 0), 2);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, near);
        assert_eq!(found[1].id, far);
    }

    #[test]
    fn test_ecm_affects_path() {
        let (mut world, a, b) = two_unit_world();
        let from = world.unit(a).unwrap().position;
        let to = world.unit(b).unwrap().position;
        assert!(!world.ecm_affects_path(TeamId(1), from, to));

        // Enemy ECM carrier sitting beside the attack line
        let mut jammer = Unit::trooper("Jammer", TeamId(2), HexCoord::new(3, 1));
        jammer.ecm_radius = 2;
        world.add_unit(jammer);
        assert!(world.ecm_affects_path(TeamId(1), from, to));
        // The carrier's own team is unaffected
        assert!(!world.ecm_affects_path(TeamId(2), from, to));
    }

    #[test]
    fn test_end_round_clears_rotary_jams_only() {
        let (mut world, a, _) = two_unit_world();
        {
            let unit = world.unit_mut(a).unwrap();
            unit.add_weapon_with_ammo(WeaponSpec::rotary_ac_5(), Munition::Standard, 20);
            unit.add_weapon_with_ammo(WeaponSpec::ultra_ac_5(), Munition::Standard, 20);
            unit.weapons[0].jammed = true;
            unit.weapons[1].jammed = true;
            unit.weapons[1].destroyed = true;
        }

        world.end_round();
        let unit = world.unit(a).unwrap();
        assert!(!unit.weapons[0].jammed);
        assert!(unit.weapons[1].jammed);
        assert!(unit.weapons[1].destroyed);
        assert_eq!(world.round, 2);
    }

    #[test]
    fn test_payload_delivery() {
        let (mut world, _, _) = two_unit_world();
        let coord = HexCoord::new(3, 3);
        world.board.set_hex(coord, Hex::woods(2));

        assert_eq!(
            world.deliver_payload(coord, Munition::Thunder, 12),
            PayloadEffect::MinefieldLaid { density: 12 }
        );
        assert_eq!(world.board.minefields_at(coord).len(), 1);

        assert_eq!(
            world.deliver_payload(coord, Munition::Inferno, 1),
            PayloadEffect::FireSet
        );
        assert!(world.board.hex(coord).on_fire);

        assert_eq!(
            world.deliver_payload(coord, Munition::Standard, 1),
            PayloadEffect::NoEffect
        );
    }
}
