//! Swarm missile retargeting
//!
//! After a swarm flight resolves against its declared target, whatever
//! did not land hunts for another unit near the point of impact. The
//! remainder is packaged as a brand-new declaration and resolved by the
//! queue loop before the next queued attack; this module only finds the
//! target, builds the continuation, and keeps the lock bookkeeping
//! straight.

use crate::attack::declaration::{AttackDeclaration, TargetRef};
use crate::core::error::Result;
use crate::core::types::UnitId;
use crate::world::{HexCoord, World};

/// How far from the resolved target loose missiles will hunt
pub const RETARGET_RANGE: u32 = 2;

/// Nearest living unit the remainder can lock onto, friend or foe.
/// Ties at equal distance break on unit id so replays stay stable.
pub fn find_new_target(world: &World, around: HexCoord, exclude: &[UnitId]) -> Option<UnitId> {
    world
        .living_units_near(around, RETARGET_RANGE)
        .into_iter()
        .map(|unit| unit.id)
        .find(|id| !exclude.contains(id))
}

/// Build the continuation declaration carrying the remainder
pub fn continuation(
    decl: &AttackDeclaration,
    resolved_target: UnitId,
    new_target: UnitId,
    remaining: u8,
) -> AttackDeclaration {
    let mut next = decl.clone();
    next.target = TargetRef::Unit(new_target);
    next.missiles_carried = Some(remaining);
    next.prior_target = Some(resolved_target);
    next
}

/// Point the firer's swarm lock at `acquired` (or clear it), releasing
/// the previous carrier
pub fn update_locks(
    world: &mut World,
    firer: UnitId,
    released: Option<UnitId>,
    acquired: Option<UnitId>,
) -> Result<()> {
    if let Some(prev) = released {
        if let Some(unit) = world.get_unit(prev) {
            if unit.swarmed_by == Some(firer) {
                world.unit_mut(prev)?.swarmed_by = None;
            }
        }
    }
    if let Some(next) = acquired {
        world.unit_mut(next)?.swarmed_by = Some(firer);
    }
    world.unit_mut(firer)?.swarm_target = acquired;
    Ok(())
}
