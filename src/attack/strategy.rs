//! Resolution strategies
//!
//! Every declared attack resolves under exactly one strategy, fixed at
//! declaration time. The engine drives each step of resolution through
//! exhaustive matches on this enum, so adding a variant forces every
//! step to say what it does there.

use crate::core::types::CombatPhase;
use serde::{Deserialize, Serialize};

/// The closed family of attack-resolution strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStrategy {
    /// Single-slug direct fire: lasers, standard autocannon
    Direct,
    /// Flamer in heat mode: pours heat into the target
    HeatDelivery,
    /// Rack weapons rolling hit counts on the cluster table
    Cluster,
    /// Swarm munitions: cluster resolution plus retargeting of
    /// undelivered missiles
    Swarm,
    /// Burst weapons that can jam; ultra cannons die on a jam
    RapidFire { destroy_on_jam: bool },
    /// Thunder/smoke/inferno delivered into a hex
    AreaPayload,
    /// Sweeping fire to clear the minefields out of a hex
    MineClearance,
    /// Deliberate attempt to set a hex alight
    DeliberateIgnition,
    /// Direct fire to bring down a structure
    StructureDemolition,
    /// Pod launcher attaching a beacon to the target
    PodDelivery,
    /// Designator painting the target for semi-guided ordnance
    Designation,
}

impl ResolutionStrategy {
    /// Whether this strategy acts in the given phase. Attacks are
    /// skipped (and stay queued) in phases they do not care about.
    pub fn cares(&self, phase: CombatPhase) -> bool {
        match self {
            ResolutionStrategy::Designation => phase == CombatPhase::Offboard,
            _ => phase == CombatPhase::Firing,
        }
    }

    /// Whether hits are rendered as one aggregate salvo rather than
    /// shot by shot
    pub fn is_salvo(&self) -> bool {
        matches!(
            self,
            ResolutionStrategy::Cluster
                | ResolutionStrategy::Swarm
                | ResolutionStrategy::RapidFire { .. }
        )
    }

    /// Whether undelivered missiles search for a new target afterwards
    pub fn retargets(&self) -> bool {
        matches!(self, ResolutionStrategy::Swarm)
    }
}
