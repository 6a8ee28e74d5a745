//! Generic attack-resolution engine
//!
//! One template drives every strategy: phase gate, defensive target
//! checks, the four-way to-hit branch, a single guarded resource
//! consumption step, the strategy's special resolution, miss handling,
//! hit counting, and the damage loop. Strategy-specific behavior enters
//! only through exhaustive matches, never through overrides.
//!
//! Swarm retargeting is returned as an explicit continuation value for
//! the queue loop to resolve; the engine never re-invokes itself.

use crate::attack::cluster;
use crate::attack::declaration::{AttackDeclaration, FiringMode, TargetRef};
use crate::attack::marking;
use crate::attack::rapid;
use crate::attack::special::{self, IgnitionAttempt};
use crate::attack::strategy::ResolutionStrategy;
use crate::attack::swarm;
use crate::attack::tohit::{self, margin_of_success, ToHit};
use crate::catalog::{DamageProfile, Munition, RangeBand, WeaponSpec};
use crate::core::error::Result;
use crate::core::types::{AttackHandle, CombatPhase, UnitId};
use crate::dice::{Dice, Roll2d6};
use crate::report::{Report, ReportKind};
use crate::rules::RulesData;
use crate::world::{HexCoord, HitLocation, World};
use tracing::debug;

/// A declared attack waiting in the queue
#[derive(Debug, Clone)]
pub struct QueuedAttack {
    pub handle: AttackHandle,
    pub declaration: AttackDeclaration,
    pub strategy: ResolutionStrategy,
    /// Set once the opening report line has been written
    pub announced: bool,
}

/// Whether an activation finished or must stay queued for a later phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Finished,
    KeepQueued,
}

/// Result of one activation
#[derive(Debug)]
pub struct ActivationOutcome {
    pub resolution: Resolution,
    /// Swarm remainder to resolve immediately, before the next queued
    /// attack
    pub continuation: Option<AttackDeclaration>,
}

impl ActivationOutcome {
    fn finished() -> Self {
        Self {
            resolution: Resolution::Finished,
            continuation: None,
        }
    }

    fn keep_queued() -> Self {
        Self {
            resolution: Resolution::KeepQueued,
            continuation: None,
        }
    }
}

/// Per-activation mutable state, discarded when the activation returns
#[derive(Debug, Default)]
struct ScratchState {
    roll: Option<Roll2d6>,
    hit: bool,
    glancing: bool,
    direct: bool,
    margin: i32,
    salvo: bool,
    heat_applied: bool,
    /// Shots a rapid-fire burst actually attempted
    shots_fired: u8,
}

/// Resolve one queued attack for the given phase
pub fn resolve_activation(
    attack: &mut QueuedAttack,
    phase: CombatPhase,
    world: &mut World,
    rules: &RulesData,
    dice: &mut Dice,
    report: &mut Report,
) -> Result<ActivationOutcome> {
    // ===== PHASE GATE =====
    if !attack.strategy.cares(phase) {
        return Ok(ActivationOutcome::keep_queued());
    }

    let decl = attack.declaration.clone();
    let strategy = attack.strategy;
    let attacker_id = decl.attacker;

    // ===== DEFENSIVE CONTEXT =====
    // An earlier attack this phase may have removed the attacker
    let (attacker_name, attacker_team, attacker_pos, spec) = match world.get_unit(attacker_id) {
        Some(unit) if unit.is_alive() => match unit.weapon(decl.weapon_slot) {
            Some(mount) => (
                unit.name.clone(),
                unit.team,
                unit.position,
                mount.spec.clone(),
            ),
            None => {
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::AttackImpossible,
                    "Attack dropped: no weapon in the declared slot",
                );
                report.separator(phase);
                return Ok(ActivationOutcome::finished());
            }
        },
        _ => {
            report.push(
                phase,
                Some(attacker_id),
                ReportKind::AttackImpossible,
                "Attack dropped: the attacker is out of action",
            );
            report.separator(phase);
            return Ok(ActivationOutcome::finished());
        }
    };
    debug!(attacker = %attacker_name, weapon = %spec.name, ?strategy, "resolving attack");

    let rack_total = spec.rack_size.max(1).saturating_mul(decl.volley_weapons.max(1));
    let missiles_in_flight = decl.missiles_carried.unwrap_or(rack_total);

    // Swarm flights press on even when their declared target is already
    // a wreck; everything else aborts through the to-hit evaluation
    let swarm_target_gone = strategy.retargets()
        && decl
            .target
            .unit_id()
            .is_some_and(|id| world.get_unit(id).map_or(true, |u| !u.is_alive()));

    // ===== ANNOUNCE =====
    if !attack.announced {
        let text = if decl.is_continuation() {
            format!(
                "{} missiles swarm onward toward {}",
                missiles_in_flight,
                describe_target(world, decl.target)
            )
        } else {
            format!(
                "{} fires {}{} at {}",
                attacker_name,
                spec.name,
                describe_loadout(&decl),
                describe_target(world, decl.target)
            )
        };
        report.push(phase, Some(attacker_id), ReportKind::AttackAnnounced, text);
        attack.announced = true;
    }

    // ===== TO-HIT =====
    let mut scratch = ScratchState {
        salvo: strategy.is_salvo(),
        ..ScratchState::default()
    };
    let eval = tohit::evaluate(world, &decl);
    let band = eval.band.unwrap_or(RangeBand::Short);

    if !swarm_target_gone {
        match &eval.outcome {
            ToHit::Impossible(reason) => {
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::AttackImpossible,
                    format!("The attack cannot be made: {}", reason),
                );
                report.separator(phase);
                return Ok(ActivationOutcome::finished());
            }
            ToHit::AutomaticFail(reason) => {
                scratch.hit = false;
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::MissReported,
                    format!("The shot is hopeless ({}) but flies anyway", reason),
                );
            }
            ToHit::AutomaticSuccess => {
                scratch.hit = true;
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::ToHit,
                    "Point-blank against a fixed target: an automatic hit",
                );
            }
            ToHit::Target(tn) => {
                let effective_tn = (*tn).max(2);
                let roll = dice.roll_2d6();
                scratch.roll = Some(roll);
                scratch.hit = i32::from(roll.total) >= effective_tn;
                scratch.margin = margin_of_success(roll.total, *tn);
                scratch.glancing = world.options.glancing_blows
                    && scratch.hit
                    && i32::from(roll.total) == effective_tn;
                scratch.direct = world.options.direct_blows
                    && scratch.hit
                    && scratch.margin >= 3
                    && !decl.target.is_static();

                let mut verdict = if scratch.hit { "hits" } else { "misses" }.to_string();
                if scratch.glancing {
                    verdict = "connects with a glancing blow".into();
                } else if scratch.direct {
                    verdict = format!("strikes true (margin {})", scratch.margin);
                }
                let kind = if scratch.hit {
                    ReportKind::ToHit
                } else {
                    ReportKind::MissReported
                };
                report.push(
                    phase,
                    Some(attacker_id),
                    kind,
                    format!(
                        "Needs {} ({}); rolls {}: {}",
                        tn,
                        eval.describe(),
                        roll,
                        verdict
                    ),
                );
            }
        }
    }

    // ===== CONSUME AMMUNITION AND HEAT =====
    // Exactly once per declared attack; continuations spent theirs at
    // launch
    let shots = match strategy {
        ResolutionStrategy::RapidFire { .. } => {
            let requested = rapid::requested_shots(decl.mode, &spec);
            let mount = world
                .unit(attacker_id)?
                .weapon(decl.weapon_slot)
                .map(|m| rapid::affordable_shots(m, decl.munition, requested));
            let affordable = mount.unwrap_or(requested).max(1);
            if affordable < requested {
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::Info,
                    format!(
                        "Only {} of {} requested rounds remain; the burst shortens",
                        affordable, requested
                    ),
                );
            }
            affordable
        }
        _ => decl.volley_weapons.max(1),
    };
    scratch.shots_fired = shots;

    if !decl.is_continuation() && !scratch.heat_applied {
        let attacker = world.unit_mut(attacker_id)?;
        if let Some(mount) = attacker.weapon_mut(decl.weapon_slot) {
            if mount.uses_ammo() {
                mount.draw_ammo(decl.munition, shots);
            }
        }
        attacker.heat += u32::from(spec.heat) * u32::from(shots);
        scratch.heat_applied = true;
    }

    // ===== SWARM FLIGHT WITH NO LIVING TARGET =====
    if swarm_target_gone {
        report.push(
            phase,
            Some(attacker_id),
            ReportKind::Info,
            format!(
                "{} is already down; the flight hunts for a new mark",
                describe_target(world, decl.target)
            ),
        );
        return finish_swarm(phase, world, report, &decl, attacker_id, missiles_in_flight, 0);
    }

    // ===== SPECIAL RESOLUTION =====
    match strategy {
        ResolutionStrategy::MineClearance if scratch.hit => {
            let coord = decl.target.static_coord().unwrap_or(attacker_pos);
            resolve_mine_clearance(world, dice, report, phase, attacker_id, coord);
            report.separator(phase);
            return Ok(ActivationOutcome::finished());
        }
        ResolutionStrategy::DeliberateIgnition if scratch.hit => {
            let coord = decl.target.static_coord().unwrap_or(attacker_pos);
            // fire_tn present: evaluation rejects fire-incapable weapons
            let fire_tn = spec.fire_tn.unwrap_or(12);
            resolve_ignition(world, dice, report, phase, attacker_id, coord, fire_tn, false);
            report.separator(phase);
            return Ok(ActivationOutcome::finished());
        }
        ResolutionStrategy::StructureDemolition if scratch.hit => {
            let coord = decl.target.static_coord().unwrap_or(attacker_pos);
            let damage = spec.damage.volley_total(dice, band, rack_total);
            let remaining = world.apply_structure_damage(coord, damage);
            let text = if remaining > 0 {
                format!(
                    "{} damage slams into the structure; CF {} remains",
                    damage, remaining
                )
            } else {
                format!("{} damage brings the structure down", damage)
            };
            report.push(phase, Some(attacker_id), ReportKind::DamageApplied, text);
            report.separator(phase);
            return Ok(ActivationOutcome::finished());
        }
        ResolutionStrategy::AreaPayload if scratch.hit => {
            let coord = decl.target.static_coord().unwrap_or(attacker_pos);
            resolve_payload(world, report, phase, attacker_id, coord, decl.munition, rack_total);
            report.separator(phase);
            return Ok(ActivationOutcome::finished());
        }
        ResolutionStrategy::Designation => {
            if let Some(target_id) = decl.target.unit_id() {
                marking::register_designation(
                    world,
                    target_id,
                    attacker_team,
                    decl.mode,
                    !scratch.hit,
                );
                let text = if scratch.hit {
                    format!(
                        "{} holds the mark on {} for incoming ordnance",
                        attacker_name,
                        describe_target(world, decl.target)
                    )
                } else {
                    "The paint slides off; the designation is recorded as wasted".to_string()
                };
                report.push(phase, Some(attacker_id), ReportKind::DesignationMarked, text);
            }
            report.separator(phase);
            return Ok(ActivationOutcome::finished());
        }
        ResolutionStrategy::RapidFire { destroy_on_jam } => {
            if let Some(roll) = scratch.roll {
                if rapid::jams_on_roll(rules, shots, roll.total) {
                    let attacker = world.unit_mut(attacker_id)?;
                    if let Some(mount) = attacker.weapon_mut(decl.weapon_slot) {
                        mount.jammed = true;
                        if destroy_on_jam {
                            mount.destroyed = true;
                        }
                    }
                    let text = if destroy_on_jam {
                        format!("{} jams catastrophically and is wrecked", spec.name)
                    } else {
                        format!("{} jams under the {}-shot burst", spec.name, shots)
                    };
                    report.push(phase, Some(attacker_id), ReportKind::WeaponJammed, text);
                    report.separator(phase);
                    return Ok(ActivationOutcome::finished());
                }
            }
        }
        _ => {}
    }

    // ===== MISS =====
    if !scratch.hit {
        resolve_miss_effects(
            world, dice, report, phase, attacker_id, &decl, &spec, band, rack_total,
        );
        if strategy.retargets() {
            // A clean miss wastes the flight; only undelivered portions
            // of resolved flights hunt onward
            report.push(
                phase,
                Some(attacker_id),
                ReportKind::MissilesWasted,
                format!("All {} missiles waste themselves", missiles_in_flight),
            );
            swarm::update_locks(world, attacker_id, decl.target.unit_id(), None)?;
        }
        report.separator(phase);
        return Ok(ActivationOutcome::finished());
    }

    // ===== POD DELIVERY =====
    if strategy == ResolutionStrategy::PodDelivery {
        if let Some(target_id) = decl.target.unit_id() {
            let (location, kind) =
                marking::attach_pod(world, dice, attacker_team, target_id, decl.munition)?;
            report.push(
                phase,
                Some(attacker_id),
                ReportKind::PodAttached,
                format!(
                    "{} clamps onto {}'s {}",
                    kind,
                    describe_target(world, decl.target),
                    location
                ),
            );
        }
        report.separator(phase);
        return Ok(ActivationOutcome::finished());
    }

    // ===== HIT COUNT =====
    let (hits, cluster_size) = compute_hits(
        world, rules, dice, report, phase, &decl, &spec, strategy, band, &scratch,
        missiles_in_flight, eval.distance,
    )?;

    // ===== DAMAGE LOOP =====
    let delivered = apply_damage(
        world, dice, report, phase, &decl, &spec, strategy, band, &scratch, hits,
        cluster_size,
    )?;

    // ===== SWARM REMAINDER =====
    if strategy.retargets() {
        let leftover = missiles_in_flight.saturating_sub(delivered);
        return finish_swarm(phase, world, report, &decl, attacker_id, leftover, delivered);
    }

    report.separator(phase);
    Ok(ActivationOutcome::finished())
}

/// Narrated description of a target reference
fn describe_target(world: &World, target: TargetRef) -> String {
    match target {
        TargetRef::Unit(id) => world
            .get_unit(id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "a vanished target".to_string()),
        TargetRef::Hex(c) => format!("hex {}", c),
        TargetRef::HexIgnite(c) => format!("the brush in hex {}", c),
        TargetRef::MinefieldClear(c) => format!("the minefields in hex {}", c),
        TargetRef::Structure(c) => format!("the structure in hex {}", c),
    }
}

/// Munition/mode suffix for the announcement line
fn describe_loadout(decl: &AttackDeclaration) -> String {
    let mut parts = Vec::new();
    if decl.munition != Munition::Standard {
        parts.push(decl.munition.to_string());
    }
    if decl.mode != FiringMode::Standard {
        parts.push(decl.mode.to_string());
    }
    if decl.volley_weapons > 1 {
        parts.push(format!("{}-weapon volley", decl.volley_weapons));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn resolve_mine_clearance(
    world: &mut World,
    dice: &mut Dice,
    report: &mut Report,
    phase: CombatPhase,
    attacker_id: UnitId,
    coord: HexCoord,
) {
    let rolls = special::clear_minefields(world, coord, dice);
    if rolls.is_empty() {
        report.push(
            phase,
            Some(attacker_id),
            ReportKind::Info,
            format!("No minefields remain in hex {}", coord),
        );
        return;
    }
    for clearance in rolls {
        let text = if clearance.swept {
            format!(
                "Sweeping fire clears a minefield (rolled {} against TN {})",
                clearance.roll, clearance.clear_tn
            )
        } else {
            format!(
                "A minefield rides out the blast (rolled {} against TN {})",
                clearance.roll, clearance.clear_tn
            )
        };
        let kind = if clearance.swept {
            ReportKind::MinefieldCleared
        } else {
            ReportKind::Info
        };
        report.push(phase, Some(attacker_id), kind, text);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_ignition(
    world: &mut World,
    dice: &mut Dice,
    report: &mut Report,
    phase: CombatPhase,
    attacker_id: UnitId,
    coord: HexCoord,
    fire_tn: u8,
    accidental: bool,
) {
    match special::attempt_ignition(world, coord, fire_tn, dice) {
        IgnitionAttempt::NotFlammable => {
            if !accidental {
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::Info,
                    format!("Nothing in hex {} will catch", coord),
                );
            }
        }
        IgnitionAttempt::Rolled { roll, started } => {
            if started {
                let text = if accidental {
                    format!("The stray shot sets hex {} alight (rolled {})", coord, roll)
                } else {
                    format!("Hex {} catches fire (rolled {} against TN {})", coord, roll, fire_tn)
                };
                report.push(phase, Some(attacker_id), ReportKind::FireStarted, text);
            } else if !accidental {
                report.push(
                    phase,
                    Some(attacker_id),
                    ReportKind::Info,
                    format!(
                        "The blaze fails to take in hex {} (rolled {} against TN {})",
                        coord, roll, fire_tn
                    ),
                );
            }
        }
    }
}

fn resolve_payload(
    world: &mut World,
    report: &mut Report,
    phase: CombatPhase,
    attacker_id: UnitId,
    coord: HexCoord,
    munition: Munition,
    rack_total: u8,
) {
    use crate::world::PayloadEffect;
    let text = match world.deliver_payload(coord, munition, rack_total) {
        PayloadEffect::MinefieldLaid { density } => format!(
            "A minefield of density {} blankets hex {}",
            density, coord
        ),
        PayloadEffect::SmokeScreened => format!("Smoke shrouds hex {}", coord),
        PayloadEffect::FireSet => format!("Inferno gel splashes across hex {} and ignites", coord),
        PayloadEffect::NoEffect => format!("The payload breaks up over hex {}", coord),
    };
    report.push(phase, Some(attacker_id), ReportKind::DamageApplied, text);
}

/// Effects a miss can still have: stray ignition, or full damage to a
/// structure sheltering the target when that rule is engaged
#[allow(clippy::too_many_arguments)]
fn resolve_miss_effects(
    world: &mut World,
    dice: &mut Dice,
    report: &mut Report,
    phase: CombatPhase,
    attacker_id: UnitId,
    decl: &AttackDeclaration,
    spec: &WeaponSpec,
    band: RangeBand,
    rack_total: u8,
) {
    let Some(target_id) = decl.target.unit_id() else {
        return;
    };
    let Some(target) = world.get_unit(target_id) else {
        return;
    };
    let target_pos = target.position;
    let sheltered = world.board.structure_at(target_pos).is_some();

    if sheltered {
        if world.options.miss_hits_structure {
            let damage = spec.damage.volley_total(dice, band, rack_total);
            let remaining = world.apply_structure_damage(target_pos, damage);
            let text = if remaining > 0 {
                format!(
                    "The miss hammers the sheltering structure for {} (CF {} remains)",
                    damage, remaining
                )
            } else {
                format!(
                    "The miss hammers the sheltering structure for {}, bringing it down",
                    damage
                )
            };
            report.push(phase, Some(attacker_id), ReportKind::DamageApplied, text);
        }
        return;
    }

    // Stray shots can start fires around an unsheltered target
    if let Some(fire_tn) = spec.fire_tn {
        resolve_ignition(
            world, dice, report, phase, attacker_id, target_pos, fire_tn, true,
        );
    }
}

/// Per-activation hit count and cluster size
#[allow(clippy::too_many_arguments)]
fn compute_hits(
    world: &mut World,
    rules: &RulesData,
    dice: &mut Dice,
    report: &mut Report,
    phase: CombatPhase,
    decl: &AttackDeclaration,
    spec: &WeaponSpec,
    strategy: ResolutionStrategy,
    band: RangeBand,
    scratch: &ScratchState,
    missiles_in_flight: u8,
    distance: u32,
) -> Result<(u8, u8)> {
    match strategy {
        ResolutionStrategy::Cluster | ResolutionStrategy::Swarm => {
            let rack = missiles_in_flight;
            // Point-blank and static targets take the whole rack
            if decl.target.is_static() || distance <= 1 {
                report.push(
                    phase,
                    Some(decl.attacker),
                    ReportKind::HitsRolled,
                    format!("All {} projectiles strike home", rack),
                );
                return Ok((rack, spec.cluster_size.max(1)));
            }

            let modifier = cluster::accumulate(
                world,
                decl,
                spec,
                strategy,
                band,
                scratch.glancing,
                scratch.direct,
                scratch.margin,
            )?;
            let (roll, hits) = rules.cluster.missiles_hit(dice, rack, modifier.total);
            let note = if modifier.notes.is_empty() {
                String::new()
            } else {
                format!("; {}", modifier.notes.join(", "))
            };
            report.push(
                phase,
                Some(decl.attacker),
                ReportKind::HitsRolled,
                format!(
                    "{} of {} projectiles connect (cluster roll {}{})",
                    hits, rack, roll, note
                ),
            );
            Ok((hits, spec.cluster_size.max(1)))
        }
        ResolutionStrategy::RapidFire { .. } => {
            let shots = scratch.shots_fired.max(1);
            if shots == 1 {
                return Ok((1, 1));
            }
            let (roll, hits) = rules.cluster.missiles_hit(dice, shots, 0);
            report.push(
                phase,
                Some(decl.attacker),
                ReportKind::HitsRolled,
                format!("{} of the {}-shot burst land (cluster roll {})", hits, shots, roll),
            );
            Ok((hits, 1))
        }
        _ => Ok((1, 1)),
    }
}

/// Apply the damage loop; returns how many projectiles were delivered
#[allow(clippy::too_many_arguments)]
fn apply_damage(
    world: &mut World,
    dice: &mut Dice,
    report: &mut Report,
    phase: CombatPhase,
    decl: &AttackDeclaration,
    spec: &WeaponSpec,
    strategy: ResolutionStrategy,
    band: RangeBand,
    scratch: &ScratchState,
    hits: u8,
    cluster_size: u8,
) -> Result<u8> {
    // Ground fire chews foliage instead of armor
    if let TargetRef::Hex(coord) = decl.target {
        let damage = spec.damage.volley_total(dice, band, hits.max(1));
        let hex_before = world.board.hex(coord).woods_level;
        let thinned = world.board.hex_mut(coord).take_clearing_damage(damage);
        let text = if hex_before == 0 {
            format!("{} damage churns the open ground of hex {}", damage, coord)
        } else if thinned {
            format!("{} damage thins the woods in hex {}", damage, coord)
        } else {
            format!("{} damage tears at the woods in hex {}", damage, coord)
        };
        report.push(phase, Some(decl.attacker), ReportKind::DamageApplied, text);
        return Ok(hits);
    }

    let Some(target_id) = decl.target.unit_id() else {
        return Ok(hits);
    };

    let mut remaining = hits;
    let mut delivered = 0u8;
    while remaining > 0 {
        // Re-check before every application: an earlier cluster may
        // have finished the target
        let Some(target) = world.get_unit(target_id) else {
            break;
        };
        if !target.is_alive() {
            break;
        }
        let target_pos = target.position;
        let target_name = target.name.clone();

        let group = cluster_size.max(1).min(remaining);
        let mut damage = match spec.damage {
            DamageProfile::PerMissile(per) => per * u32::from(group),
            _ => spec.damage.per_hit(dice, band),
        };

        // Cluster strategies already paid glancing/direct on the table
        // roll; single-hit strategies shift the damage itself
        if !scratch.salvo {
            if scratch.glancing {
                damage /= 2;
            }
            if scratch.direct {
                damage += (scratch.margin / 3).max(0) as u32;
            }
        }

        // Flamers on heat and inferno warheads cook instead of crush
        if strategy == ResolutionStrategy::HeatDelivery || decl.munition == Munition::Inferno {
            world.unit_mut(target_id)?.heat += damage;
            report.push(
                phase,
                Some(decl.attacker),
                ReportKind::DamageApplied,
                format!("{} heat floods into {}", damage, target_name),
            );
            remaining -= group;
            delivered = delivered.saturating_add(group);
            continue;
        }

        let absorption = special::absorb_terrain(world, target_pos, damage, spec.capital);
        let mut suffixes = Vec::new();
        if absorption.absorbed > 0 {
            suffixes.push(format!("{} soaked by the woods", absorption.absorbed));
            if absorption.thinned {
                suffixes.push("the woods thin under the fire".to_string());
            }
        }

        let mut final_damage = absorption.remaining;
        if let Some(shielding) = special::shield_by_structure(world, target_pos, final_damage) {
            if shielding.shielded > 0 {
                suffixes.push(format!("{} taken by the structure", shielding.shielded));
            }
            final_damage = shielding.remaining;
        }

        let location = HitLocation::roll(dice);
        let result = world.apply_unit_damage(target_id, location, final_damage)?;

        let lead = if scratch.salvo && group > 1 {
            format!("{} missiles slam into the {}", group, location)
        } else {
            format!("The hit lands on the {}", location)
        };
        let suffix = if suffixes.is_empty() {
            String::new()
        } else {
            format!(" ({})", suffixes.join(", "))
        };
        report.push(
            phase,
            Some(decl.attacker),
            ReportKind::DamageApplied,
            format!("{} for {} damage{}", lead, final_damage, suffix),
        );

        if result.destroyed {
            report.push(
                phase,
                Some(decl.attacker),
                ReportKind::Info,
                format!("{} is destroyed!", target_name),
            );
        }

        remaining -= group;
        delivered = delivered.saturating_add(group);
    }

    Ok(delivered)
}

/// Close out a swarm activation: hunt with the leftover missiles or
/// waste them
#[allow(clippy::too_many_arguments)]
fn finish_swarm(
    phase: CombatPhase,
    world: &mut World,
    report: &mut Report,
    decl: &AttackDeclaration,
    attacker_id: UnitId,
    leftover: u8,
    delivered: u8,
) -> Result<ActivationOutcome> {
    let resolved_target = decl.target.unit_id();

    if leftover == 0 {
        swarm::update_locks(world, attacker_id, resolved_target, None)?;
        report.separator(phase);
        return Ok(ActivationOutcome::finished());
    }

    let around = resolved_target
        .and_then(|id| world.get_unit(id))
        .map(|u| u.position)
        .or_else(|| decl.target.static_coord());

    let mut exclude: Vec<UnitId> = vec![attacker_id];
    if let Some(id) = resolved_target {
        exclude.push(id);
    }
    if let Some(id) = decl.prior_target {
        exclude.push(id);
    }

    let found = around.and_then(|pos| swarm::find_new_target(world, pos, &exclude));
    match found {
        Some(new_target) => {
            swarm::update_locks(world, attacker_id, resolved_target, Some(new_target))?;
            let name = world.unit(new_target)?.name.clone();
            let verb = if delivered > 0 { "remaining" } else { "loose" };
            report.push(
                phase,
                Some(attacker_id),
                ReportKind::Info,
                format!("{} {} missiles stay aloft, hunting {}", leftover, verb, name),
            );
            report.separator(phase);
            Ok(ActivationOutcome {
                resolution: Resolution::Finished,
                continuation: Some(swarm::continuation(
                    decl,
                    resolved_target.unwrap_or(attacker_id),
                    new_target,
                    leftover,
                )),
            })
        }
        None => {
            swarm::update_locks(world, attacker_id, resolved_target, None)?;
            report.push(
                phase,
                Some(attacker_id),
                ReportKind::MissilesWasted,
                format!("{} missiles find nothing and waste themselves", leftover),
            );
            report.separator(phase);
            Ok(ActivationOutcome::finished())
        }
    }
}

// ===== Integration Tests =====
