//! Fusillade - Demo Skirmish
//!
//! Deploys two small lances on a scratch battlefield, declares a spread
//! of attacks covering the resolution strategies, then drives the phase
//! loop and prints the narrated report. Useful for eyeballing the
//! engine's output and as a seed-reproducible smoke run.

use clap::Parser;
use fusillade::attack::{AttackDeclaration, AttackQueue, FiringMode, TargetRef};
use fusillade::catalog::{Munition, PodKind, WeaponSpec};
use fusillade::core::config::GameOptions;
use fusillade::core::error::Result;
use fusillade::core::types::{TeamId, UnitId};
use fusillade::dice::Dice;
use fusillade::rules::{load_rules, RulesData};
use fusillade::world::{Hex, HexCoord, Minefield, Structure, Unit, World};
use std::path::PathBuf;

/// Demo skirmish driver
#[derive(Parser, Debug)]
#[command(name = "fusillade")]
#[command(about = "Resolve a demo skirmish and print the combat report")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding cluster.toml and jam.toml overrides
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Rounds to resolve
    #[arg(long, default_value_t = 2)]
    rounds: u32,

    /// Dump the final world state as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Enable the optional glancing/direct blow rules
    #[arg(long)]
    optional_rules: bool,
}

/// Unit handles for the demo forces
struct Forces {
    archer: UnitId,
    gunner: UnitId,
    spotter: UnitId,
    brawler: UnitId,
    raider: UnitId,
    lurker: UnitId,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "fusillade=info".to_string()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "fusillade demo starting");

    let rules = match &args.tables {
        Some(dir) => load_rules(dir)?,
        None => RulesData::builtin()?,
    };
    let mut dice = Dice::seeded(seed);

    let options = if args.optional_rules {
        GameOptions::all_enabled()
    } else {
        GameOptions::default()
    };
    let mut world = World::new(options);
    let forces = deploy(&mut world);

    println!("=== FUSILLADE DEMO SKIRMISH (seed {}) ===", seed);

    let mut queue = AttackQueue::new();
    for round in 1..=args.rounds {
        declare_round(&mut queue, &world, &forces, round)?;
        let report = queue.resolve_round(&mut world, &rules, &mut dice)?;
        println!("--- Round {} ---", round);
        print!("{}", report);
    }

    println!("--- Survivors ---");
    for unit in world.units() {
        let state = if unit.is_alive() { "standing" } else { "destroyed" };
        println!(
            "{} ({}): {} armor, heat {}, {}",
            unit.name,
            unit.team.0,
            unit.total_armor(),
            unit.heat,
            state
        );
    }

    if args.json {
        let survivors: Vec<&Unit> = world.units().collect();
        println!("{}", serde_json::to_string_pretty(&survivors)?);
    }

    Ok(())
}

/// Two lances facing off across a wooded strip with a fortified hex
fn deploy(world: &mut World) -> Forces {
    // Terrain: a woods belt, a structure the lurker hides in, a minefield
    world.board.set_hex(HexCoord::new(6, 0), Hex::woods(2));
    world.board.set_hex(HexCoord::new(4, 0), Hex::woods(1));
    world.board.add_structure(HexCoord::new(10, 1), Structure::new(60));
    world.board.add_minefield(HexCoord::new(5, 0), Minefield::conventional());

    let mut archer = Unit::trooper("Archer", TeamId(0), HexCoord::new(0, 0));
    archer.add_weapon_with_ammo(WeaponSpec::lrm_20(), Munition::ArtemisGuided, 12);
    archer.add_weapon_with_ammo(WeaponSpec::lrm_10(), Munition::Swarm, 12);
    let archer = world.add_unit(archer);

    let mut gunner = Unit::trooper("Gunner", TeamId(0), HexCoord::new(1, 1));
    gunner.add_weapon_with_ammo(WeaponSpec::rotary_ac_5(), Munition::Standard, 40);
    gunner.add_weapon(WeaponSpec::medium_laser());
    let gunner = world.add_unit(gunner);

    let mut spotter = Unit::trooper("Spotter", TeamId(0), HexCoord::new(2, 0));
    spotter.add_weapon(WeaponSpec::tag());
    spotter.add_weapon_with_ammo(WeaponSpec::narc_launcher(), Munition::NarcPod(PodKind::Standard), 6);
    spotter.add_weapon(WeaponSpec::flamer());
    let spotter = world.add_unit(spotter);

    let mut brawler = Unit::trooper("Brawler", TeamId(1), HexCoord::new(9, 0));
    brawler.add_weapon_with_ammo(WeaponSpec::srm_6(), Munition::Standard, 15);
    brawler.ams = true;
    let brawler = world.add_unit(brawler);

    let mut raider = Unit::trooper("Raider", TeamId(1), HexCoord::new(10, 0));
    raider.add_weapon_with_ammo(WeaponSpec::ultra_ac_5(), Munition::Standard, 20);
    let raider = world.add_unit(raider);

    let mut lurker = Unit::trooper("Lurker", TeamId(1), HexCoord::new(10, 1));
    lurker.add_weapon_with_ammo(WeaponSpec::lrm_10(), Munition::Standard, 12);
    lurker.stealth_active = true;
    let lurker = world.add_unit(lurker);

    Forces {
        archer,
        gunner,
        spotter,
        brawler,
        raider,
        lurker,
    }
}

/// Queue a spread of attacks exercising the different strategies
fn declare_round(
    queue: &mut AttackQueue,
    world: &World,
    forces: &Forces,
    round: u32,
) -> Result<()> {
    let declarations: Vec<AttackDeclaration> = match round {
        1 => vec![
            // Paint first so the guided rounds later have a record
            AttackDeclaration::new(forces.spotter, TargetRef::Unit(forces.brawler), 0),
            AttackDeclaration::new(forces.spotter, TargetRef::Unit(forces.raider), 1)
                .with_munition(Munition::NarcPod(PodKind::Standard)),
            AttackDeclaration::new(forces.archer, TargetRef::Unit(forces.brawler), 0)
                .with_munition(Munition::ArtemisGuided),
            AttackDeclaration::new(forces.gunner, TargetRef::Unit(forces.raider), 0)
                .with_mode(FiringMode::Rotary(6)),
            AttackDeclaration::new(forces.raider, TargetRef::Unit(forces.gunner), 0)
                .with_mode(FiringMode::Ultra),
            AttackDeclaration::new(forces.brawler, TargetRef::MinefieldClear(HexCoord::new(5, 0)), 0),
            AttackDeclaration::new(forces.lurker, TargetRef::Unit(forces.archer), 0),
        ],
        _ => vec![
            AttackDeclaration::new(forces.archer, TargetRef::Unit(forces.brawler), 1)
                .with_munition(Munition::Swarm),
            AttackDeclaration::new(forces.gunner, TargetRef::Structure(HexCoord::new(10, 1)), 1),
            AttackDeclaration::new(forces.spotter, TargetRef::HexIgnite(HexCoord::new(4, 0)), 2),
            AttackDeclaration::new(forces.raider, TargetRef::Unit(forces.spotter), 0),
            AttackDeclaration::new(forces.brawler, TargetRef::Unit(forces.gunner), 0),
        ],
    };

    for declaration in declarations {
        // Dead attackers simply sit the round out
        if world
            .get_unit(declaration.attacker)
            .map_or(false, |u| u.is_alive())
        {
            queue.declare(world, declaration)?;
        }
    }
    Ok(())
}
