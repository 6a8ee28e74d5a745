//! Combat units: armor diagram, weapon mounts, electronics fit

use crate::catalog::{Munition, PodKind, WeaponSpec};
use crate::core::types::{TeamId, UnitId};
use crate::dice::Dice;
use crate::world::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Armor locations on the standard humanoid diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitLocation {
    Head,
    CenterTorso,
    LeftTorso,
    RightTorso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl HitLocation {
    pub const ALL: [HitLocation; 8] = [
        HitLocation::Head,
        HitLocation::CenterTorso,
        HitLocation::LeftTorso,
        HitLocation::RightTorso,
        HitLocation::LeftArm,
        HitLocation::RightArm,
        HitLocation::LeftLeg,
        HitLocation::RightLeg,
    ];

    pub fn index(self) -> usize {
        match self {
            HitLocation::Head => 0,
            HitLocation::CenterTorso => 1,
            HitLocation::LeftTorso => 2,
            HitLocation::RightTorso => 3,
            HitLocation::LeftArm => 4,
            HitLocation::RightArm => 5,
            HitLocation::LeftLeg => 6,
            HitLocation::RightLeg => 7,
        }
    }

    /// Roll a hit location on the front-arc table
    pub fn roll(dice: &mut Dice) -> Self {
        match dice.roll_2d6().total {
            2 => HitLocation::CenterTorso,
            3 | 4 => HitLocation::RightArm,
            5 => HitLocation::RightLeg,
            6 => HitLocation::RightTorso,
            7 => HitLocation::CenterTorso,
            8 => HitLocation::LeftTorso,
            9 => HitLocation::LeftLeg,
            10 | 11 => HitLocation::LeftArm,
            _ => HitLocation::Head,
        }
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HitLocation::Head => "head",
            HitLocation::CenterTorso => "center torso",
            HitLocation::LeftTorso => "left torso",
            HitLocation::RightTorso => "right torso",
            HitLocation::LeftArm => "left arm",
            HitLocation::RightArm => "right arm",
            HitLocation::LeftLeg => "left leg",
            HitLocation::RightLeg => "right leg",
        };
        write!(f, "{}", name)
    }
}

/// One magazine feeding a weapon mount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmoBin {
    pub munition: Munition,
    pub rounds: u8,
}

impl AmmoBin {
    pub fn new(munition: Munition, rounds: u8) -> Self {
        Self { munition, rounds }
    }
}

/// A weapon installed on a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponMount {
    pub spec: WeaponSpec,
    /// Magazines; empty for weapons that feed themselves (energy,
    /// designators)
    pub bins: Vec<AmmoBin>,
    pub jammed: bool,
    pub destroyed: bool,
}

impl WeaponMount {
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            bins: Vec::new(),
            jammed: false,
            destroyed: false,
        }
    }

    pub fn with_ammo(spec: WeaponSpec, munition: Munition, rounds: u8) -> Self {
        let mut mount = Self::new(spec);
        mount.bins.push(AmmoBin::new(munition, rounds));
        mount
    }

    pub fn is_usable(&self) -> bool {
        !self.jammed && !self.destroyed
    }

    /// Whether this mount draws from magazines at all
    pub fn uses_ammo(&self) -> bool {
        !self.bins.is_empty()
    }

    /// Rounds of a munition available across all bins
    pub fn rounds_available(&self, munition: Munition) -> u32 {
        self.bins
            .iter()
            .filter(|b| b.munition == munition)
            .map(|b| u32::from(b.rounds))
            .sum()
    }

    /// Draw shots of a munition, rolling into the next bin when one
    /// empties; returns the number actually drawn
    pub fn draw_ammo(&mut self, munition: Munition, shots: u8) -> u8 {
        let mut remaining = shots;
        for bin in self.bins.iter_mut().filter(|b| b.munition == munition) {
            if remaining == 0 {
                break;
            }
            let taken = bin.rounds.min(remaining);
            bin.rounds -= taken;
            remaining -= taken;
        }
        shots - remaining
    }
}

/// A pod stuck to a unit's hull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedPod {
    pub team: TeamId,
    pub kind: PodKind,
    pub location: HitLocation,
}

/// Result of applying damage to one location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub armor_damage: u32,
    pub internal_damage: u32,
    pub destroyed: bool,
}

/// A combat unit on the battlefield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: TeamId,
    pub position: HexCoord,
    /// Base gunnery skill; lower is better
    pub gunnery: u8,
    /// Armor points by HitLocation index
    pub armor: [u32; 8],
    /// Internal structure pool; the unit dies when it empties
    pub internal: u32,
    pub heat: u32,
    pub weapons: Vec<WeaponMount>,
    pub stealth_active: bool,
    /// ECM bubble radius in hexes; 0 for no ECM
    pub ecm_radius: u32,
    pub ams: bool,
    pub ams_used_this_phase: bool,
    pub pods: Vec<AttachedPod>,
    /// Target this unit's swarm missiles are currently locked onto
    pub swarm_target: Option<UnitId>,
    /// Unit whose swarm missiles are locked onto this one
    pub swarmed_by: Option<UnitId>,
    pub immobile: bool,
    pub destroyed: bool,
}

impl Unit {
    /// A line trooper with a standard armor diagram and no weapons
    pub fn trooper(name: impl Into<String>, team: TeamId, position: HexCoord) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            team,
            position,
            gunnery: 4,
            armor: [9, 20, 16, 16, 12, 12, 14, 14],
            internal: 30,
            heat: 0,
            weapons: Vec::new(),
            stealth_active: false,
            ecm_radius: 0,
            ams: false,
            ams_used_this_phase: false,
            pods: Vec::new(),
            swarm_target: None,
            swarmed_by: None,
            immobile: false,
            destroyed: false,
        }
    }

    /// Mount a weapon without magazines; returns its slot index
    pub fn add_weapon(&mut self, spec: WeaponSpec) -> usize {
        self.weapons.push(WeaponMount::new(spec));
        self.weapons.len() - 1
    }

    /// Mount a weapon fed by a single magazine; returns its slot index
    pub fn add_weapon_with_ammo(
        &mut self,
        spec: WeaponSpec,
        munition: Munition,
        rounds: u8,
    ) -> usize {
        self.weapons.push(WeaponMount::with_ammo(spec, munition, rounds));
        self.weapons.len() - 1
    }

    pub fn weapon(&self, slot: usize) -> Option<&WeaponMount> {
        self.weapons.get(slot)
    }

    pub fn weapon_mut(&mut self, slot: usize) -> Option<&mut WeaponMount> {
        self.weapons.get_mut(slot)
    }

    pub fn is_alive(&self) -> bool {
        !self.destroyed
    }

    /// Whether a pod of the given team is attached anywhere on the hull
    pub fn has_pod_of_team(&self, team: TeamId) -> bool {
        self.pods.iter().any(|p| p.team == team)
    }

    /// Apply damage at a location: armor first, overflow to internal
    /// structure, destruction when the internals empty
    pub fn take_damage(&mut self, location: HitLocation, amount: u32) -> DamageResult {
        let slot = &mut self.armor[location.index()];
        let armor_damage = (*slot).min(amount);
        *slot -= armor_damage;

        let overflow = amount - armor_damage;
        let internal_damage = self.internal.min(overflow);
        self.internal -= internal_damage;

        if self.internal == 0 {
            self.destroyed = true;
        }

        DamageResult {
            armor_damage,
            internal_damage,
            destroyed: self.destroyed,
        }
    }

    pub fn total_armor(&self) -> u32 {
        self.armor.iter().sum()
    }
}
