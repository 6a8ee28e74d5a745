//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for battlefield units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Team membership, used for pod ownership and designation records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u8);

/// Opaque handle to a declared attack sitting in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackHandle(pub u32);

/// Combat phases, processed to completion one at a time
///
/// Designator attacks resolve in Offboard; every other queued attack
/// resolves in Firing and rides through earlier phases untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatPhase {
    Offboard,
    Firing,
    Physical,
    End,
}

impl CombatPhase {
    /// Phase order within a single combat round
    pub fn sequence() -> [CombatPhase; 4] {
        [
            CombatPhase::Offboard,
            CombatPhase::Firing,
            CombatPhase::Physical,
            CombatPhase::End,
        ]
    }
}

impl fmt::Display for CombatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CombatPhase::Offboard => "Offboard",
            CombatPhase::Firing => "Firing",
            CombatPhase::Physical => "Physical",
            CombatPhase::End => "End",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_equality() {
        let a = UnitId::new();
        let b = UnitId::new();
        assert_eq!(a, a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_id_hash() {
        use std::collections::HashMap;
        let id = UnitId::new();
        let mut map: HashMap<UnitId, &str> = HashMap::new();
        map.insert(id, "lance alpha");
        assert_eq!(map.get(&id), Some(&"lance alpha"));
    }

    #[test]
    fn test_phase_sequence_starts_offboard() {
        let seq = CombatPhase::sequence();
        assert_eq!(seq[0], CombatPhase::Offboard);
        assert_eq!(seq[1], CombatPhase::Firing);
    }
}
