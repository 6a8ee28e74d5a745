//! Cluster-roll modifier accumulation
//!
//! Rack weapons roll once on the cluster table; everything that helps
//! or hinders the flight shows up as a modifier on that roll. Each term
//! is recorded with its reason so the report can show the arithmetic.

use crate::attack::declaration::{AttackDeclaration, FiringMode};
use crate::attack::strategy::ResolutionStrategy;
use crate::catalog::{RangeBand, WeaponFamily, WeaponSpec};
use crate::core::error::Result;
use crate::world::World;

/// Glancing blows pull the cluster roll down by this much
const GLANCING_CLUSTER_SHIFT: i32 = -4;
/// Electromagnetic interference penalty when the option is in force
const EMI_CLUSTER_SHIFT: i32 = -2;
/// Guided munitions and pod locks each add this
const GUIDANCE_CLUSTER_BONUS: i32 = 2;
/// An anti-missile system thins the incoming flight by this much
const AMS_CLUSTER_SHIFT: i32 = -4;

/// Net cluster-roll modifier plus the reasons behind each term
#[derive(Debug, Clone, Default)]
pub struct ClusterModifier {
    pub total: i32,
    pub notes: Vec<String>,
}

impl ClusterModifier {
    fn add(&mut self, value: i32, reason: &str) {
        self.total += value;
        if value >= 0 {
            self.notes.push(format!("+{} ({})", value, reason));
        } else {
            self.notes.push(format!("{} ({})", value, reason));
        }
    }

    fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }
}

/// Accumulate the cluster-roll modifier for an attack
///
/// Consumes the target's AMS for the phase when it engages the flight;
/// that is the only battlefield mutation here.
pub fn accumulate(
    world: &mut World,
    decl: &AttackDeclaration,
    spec: &WeaponSpec,
    strategy: ResolutionStrategy,
    band: RangeBand,
    glancing: bool,
    direct: bool,
    margin: i32,
) -> Result<ClusterModifier> {
    let mut modifier = ClusterModifier::default();

    let (attacker_team, attacker_pos, attacker_stealthed) = {
        let attacker = world.unit(decl.attacker)?;
        (attacker.team, attacker.position, attacker.stealth_active)
    };

    let bracket_mod = spec.cluster_modifier_at(band);
    if bracket_mod != 0 {
        modifier.add(bracket_mod, "range bracket");
    }

    if decl.munition.is_guided() {
        if attacker_stealthed {
            modifier.note("guidance suppressed (own stealth armor active)");
        } else {
            let target_pos = match decl.target.unit_id() {
                Some(id) => world.unit(id)?.position,
                None => decl.target.static_coord().unwrap_or(attacker_pos),
            };
            if world.ecm_affects_path(attacker_team, attacker_pos, target_pos) {
                modifier.note("guidance suppressed (hostile ECM on the attack path)");
            } else {
                modifier.add(GUIDANCE_CLUSTER_BONUS, "guided munition");
            }
        }
    }

    if let Some(target_id) = decl.target.unit_id() {
        let target = world.unit(target_id)?;
        if target.has_pod_of_team(attacker_team)
            && decl.munition.is_pod_compatible()
            && decl.mode != FiringMode::Indirect
        {
            modifier.add(GUIDANCE_CLUSTER_BONUS, "pod lock");
        }
    }

    if glancing {
        modifier.add(GLANCING_CLUSTER_SHIFT, "glancing blow");
    }
    if direct {
        let bonus = 2 * (margin / 3);
        if bonus > 0 {
            modifier.add(bonus, "direct blow");
        }
    }

    if world.options.emi {
        modifier.add(EMI_CLUSTER_SHIFT, "electromagnetic interference");
    }

    // AMS engages missile flights only, once per phase
    if spec.family == WeaponFamily::MissileRack
        && matches!(
            strategy,
            ResolutionStrategy::Cluster | ResolutionStrategy::Swarm
        )
    {
        if let Some(target_id) = decl.target.unit_id() {
            let engages = {
                let target = world.unit(target_id)?;
                target.ams && !target.ams_used_this_phase
            };
            if engages {
                world.unit_mut(target_id)?.ams_used_this_phase = true;
                modifier.add(AMS_CLUSTER_SHIFT, "anti-missile fire");
            }
        }
    }

    Ok(modifier)
}
