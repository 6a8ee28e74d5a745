//! Pod attachment and target designation
//!
//! Launched pods stick to a rolled hit location and grant the owning
//! team bonuses later; designators register records that semi-guided
//! ordnance consumes. A missed designation still leaves a record, so
//! dependent ordnance knows the shot was spent.

use crate::attack::declaration::FiringMode;
use crate::catalog::{Munition, PodKind};
use crate::core::error::Result;
use crate::core::types::{TeamId, UnitId};
use crate::dice::Dice;
use crate::world::{AttachedPod, Designation, HitLocation, World};

/// Pod subtype carried by the munition; plain beacon by default
pub fn pod_kind(munition: Munition) -> PodKind {
    match munition {
        Munition::NarcPod(kind) => kind,
        _ => PodKind::Standard,
    }
}

/// Attach a pod to a rolled hit location on the target
pub fn attach_pod(
    world: &mut World,
    dice: &mut Dice,
    team: TeamId,
    target: UnitId,
    munition: Munition,
) -> Result<(HitLocation, PodKind)> {
    let location = HitLocation::roll(dice);
    let kind = pod_kind(munition);
    world.attach_pod(
        target,
        AttachedPod {
            team,
            kind,
            location,
        },
    )?;
    Ok((location, kind))
}

/// Dual-beam designators mark at a higher priority
pub fn designation_priority(mode: FiringMode) -> u8 {
    match mode {
        FiringMode::Dual => 2,
        _ => 1,
    }
}

/// Register a designation record; `wasted` marks a missed paint
pub fn register_designation(
    world: &mut World,
    target: UnitId,
    team: TeamId,
    mode: FiringMode,
    wasted: bool,
) {
    world.register_designation(Designation {
        target,
        team,
        priority: designation_priority(mode),
        wasted,
    });
}
