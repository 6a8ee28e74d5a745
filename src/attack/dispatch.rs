//! Strategy dispatch
//!
//! Selects the one strategy a declaration resolves under. Pure function
//! of weapon family, munition, firing mode, and target kind; selected
//! once at declaration time and never re-evaluated mid-resolution.
//! Swarm continuations are re-dispatched as fresh declarations.

use crate::attack::declaration::{AttackDeclaration, FiringMode, TargetRef};
use crate::attack::strategy::ResolutionStrategy;
use crate::catalog::{Munition, WeaponFamily, WeaponSpec};

/// Select the resolution strategy for a declaration
pub fn select_strategy(decl: &AttackDeclaration, spec: &WeaponSpec) -> ResolutionStrategy {
    // Target kind decides first: terrain attacks resolve the same way
    // no matter what fires them
    match decl.target {
        TargetRef::MinefieldClear(_) => return ResolutionStrategy::MineClearance,
        TargetRef::HexIgnite(_) => return ResolutionStrategy::DeliberateIgnition,
        TargetRef::Structure(_) => return ResolutionStrategy::StructureDemolition,
        TargetRef::Hex(_) if decl.munition.is_area_payload() => {
            return ResolutionStrategy::AreaPayload;
        }
        _ => {}
    }

    match spec.family {
        WeaponFamily::Designator => ResolutionStrategy::Designation,
        WeaponFamily::PodLauncher => ResolutionStrategy::PodDelivery,
        WeaponFamily::UltraCannon if decl.mode == FiringMode::Ultra => {
            ResolutionStrategy::RapidFire {
                destroy_on_jam: true,
            }
        }
        WeaponFamily::RotaryCannon | WeaponFamily::MachineGun
            if matches!(decl.mode, FiringMode::Rotary(_)) =>
        {
            ResolutionStrategy::RapidFire {
                destroy_on_jam: false,
            }
        }
        WeaponFamily::MissileRack if decl.munition == Munition::Swarm => {
            ResolutionStrategy::Swarm
        }
        WeaponFamily::Energy if decl.mode == FiringMode::Heat => {
            ResolutionStrategy::HeatDelivery
        }
        _ if spec.rolls_on_cluster_table() => ResolutionStrategy::Cluster,
        _ => ResolutionStrategy::Direct,
    }
}
