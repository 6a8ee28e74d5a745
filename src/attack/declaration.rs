//! Attack declarations
//!
//! A declaration is the immutable record of one weapon activation:
//! who fires what, at what, loaded with which munition, in which mode.
//! Swarm retargeting never mutates a declaration; it builds a new one
//! carrying the undelivered missiles and the prior target.

use crate::catalog::Munition;
use crate::core::types::UnitId;
use crate::world::HexCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an attack is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    /// A unit on the battlefield
    Unit(UnitId),
    /// Ground fire into a hex (woods clearing, payload delivery)
    Hex(HexCoord),
    /// Deliberate attempt to set a hex alight
    HexIgnite(HexCoord),
    /// Sweep the minefields out of a hex
    MinefieldClear(HexCoord),
    /// Bring down the structure in a hex
    Structure(HexCoord),
}

impl TargetRef {
    /// Whether the target is terrain rather than a unit
    pub fn is_static(&self) -> bool {
        !matches!(self, TargetRef::Unit(_))
    }

    pub fn unit_id(&self) -> Option<UnitId> {
        match self {
            TargetRef::Unit(id) => Some(*id),
            _ => None,
        }
    }

    /// Coordinate of a static target; unit positions live on the unit
    pub fn static_coord(&self) -> Option<HexCoord> {
        match self {
            TargetRef::Unit(_) => None,
            TargetRef::Hex(c)
            | TargetRef::HexIgnite(c)
            | TargetRef::MinefieldClear(c)
            | TargetRef::Structure(c) => Some(*c),
        }
    }
}

/// Firing mode selected at declaration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringMode {
    Standard,
    /// Ultra autocannon double-rate fire (2 shots)
    Ultra,
    /// Rotary burst of the requested shot count
    Rotary(u8),
    /// Flamer pours heat into the target instead of damage
    Heat,
    /// Arcing fire without line of sight
    Indirect,
    /// Dual designator beam; marks at higher priority
    Dual,
}

impl fmt::Display for FiringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiringMode::Standard => write!(f, "standard"),
            FiringMode::Ultra => write!(f, "ultra"),
            FiringMode::Rotary(n) => write!(f, "{}-shot burst", n),
            FiringMode::Heat => write!(f, "heat"),
            FiringMode::Indirect => write!(f, "indirect"),
            FiringMode::Dual => write!(f, "dual"),
        }
    }
}

/// One declared weapon attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDeclaration {
    pub attacker: UnitId,
    pub target: TargetRef,
    /// Index into the attacker's weapon mounts
    pub weapon_slot: usize,
    pub munition: Munition,
    pub mode: FiringMode,
    /// Identical launchers fired as one volley (1 for a lone weapon)
    pub volley_weapons: u8,
    /// Missiles carried forward by a swarm continuation
    pub missiles_carried: Option<u8>,
    /// Target the swarm already resolved against
    pub prior_target: Option<UnitId>,
}

impl AttackDeclaration {
    pub fn new(attacker: UnitId, target: TargetRef, weapon_slot: usize) -> Self {
        Self {
            attacker,
            target,
            weapon_slot,
            munition: Munition::Standard,
            mode: FiringMode::Standard,
            volley_weapons: 1,
            missiles_carried: None,
            prior_target: None,
        }
    }

    pub fn with_munition(mut self, munition: Munition) -> Self {
        self.munition = munition;
        self
    }

    pub fn with_mode(mut self, mode: FiringMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_volley(mut self, weapons: u8) -> Self {
        self.volley_weapons = weapons.max(1);
        self
    }

    /// Whether this declaration was spawned by swarm retargeting.
    /// Continuations never consume ammo or add heat again.
    pub fn is_continuation(&self) -> bool {
        self.missiles_carried.is_some()
    }
}
