//! Munition subtypes
//!
//! A weapon mount fires whatever munition its selected bin holds; the
//! munition shifts guidance bonuses, payload behavior, and pod kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pod subtype carried by a pod launcher round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodKind {
    /// Plain homing beacon granting missile bonuses to the owning team
    Standard,
    /// Jams the carrier's electronics
    Ecm,
    /// Induces system malfunctions on the carrier
    Haywire,
    /// Decoy beacon drawing friendly fire toward the carrier
    Nemesis,
}

impl fmt::Display for PodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PodKind::Standard => "Narc",
            PodKind::Ecm => "ECM Narc",
            PodKind::Haywire => "Haywire Narc",
            PodKind::Nemesis => "Nemesis Narc",
        };
        write!(f, "{}", name)
    }
}

/// Munition subtype loaded in an ammo bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Munition {
    Standard,
    /// Artemis-linked rounds; +2 on the cluster roll unless suppressed
    ArtemisGuided,
    /// Retargets undelivered missiles onto nearby units
    Swarm,
    /// Sets the target alight instead of dealing full damage
    Inferno,
    /// Scatters a minefield in the target hex
    Thunder,
    /// Screens the target hex with smoke
    Smoke,
    /// Pod payload for launcher weapons
    NarcPod(PodKind),
}

impl Munition {
    /// Eligible for the guided-munition cluster bonus
    pub fn is_guided(self) -> bool {
        matches!(self, Munition::ArtemisGuided)
    }

    /// Benefits from a friendly pod attached to the target
    pub fn is_pod_compatible(self) -> bool {
        matches!(self, Munition::Standard)
    }

    /// Delivered into a hex rather than against a unit's armor
    pub fn is_area_payload(self) -> bool {
        matches!(self, Munition::Thunder | Munition::Smoke | Munition::Inferno)
    }
}

impl fmt::Display for Munition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Munition::Standard => write!(f, "standard"),
            Munition::ArtemisGuided => write!(f, "Artemis-guided"),
            Munition::Swarm => write!(f, "swarm"),
            Munition::Inferno => write!(f, "inferno"),
            Munition::Thunder => write!(f, "Thunder"),
            Munition::Smoke => write!(f, "smoke"),
            Munition::NarcPod(kind) => write!(f, "{}", kind),
        }
    }
}
