//! Terrain, structure, minefield, and fire interactions
//!
//! These helpers own the battlefield side effects shared by several
//! strategies: foliage soaking damage out of a shot, structures
//! shielding their occupants, sweeping minefields, and setting hexes
//! alight. All of them mutate the world only through its sink methods.

use crate::dice::{Dice, Roll2d6};
use crate::world::{HexCoord, World};

/// Damage soaked by foliage before it reaches the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: u32,
    pub remaining: u32,
    /// The clearing damage thinned the woods a level
    pub thinned: bool,
}

/// Reduce incoming damage by the target hex's foliage, applying the
/// absorbed amount to the foliage as clearing damage
pub fn absorb_terrain(world: &mut World, coord: HexCoord, damage: u32, capital: bool) -> Absorption {
    if capital || damage == 0 {
        return Absorption {
            absorbed: 0,
            remaining: damage,
            thinned: false,
        };
    }
    let absorbed = world.board.hex(coord).absorption().min(damage);
    let thinned = if absorbed > 0 {
        world.board.hex_mut(coord).take_clearing_damage(absorbed)
    } else {
        false
    };
    Absorption {
        absorbed,
        remaining: damage - absorbed,
        thinned,
    }
}

/// Damage shifted onto a sheltering structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shielding {
    pub shielded: u32,
    pub remaining: u32,
    pub cf_remaining: u32,
}

/// Shield an in-structure target: part of the damage lands on the
/// structure instead. None when the hex has no structure.
pub fn shield_by_structure(world: &mut World, coord: HexCoord, damage: u32) -> Option<Shielding> {
    let structure = world.board.structure_at(coord)?;
    let shielded = structure.shield_amount().min(damage);
    let cf_remaining = world.apply_structure_damage(coord, shielded);
    Some(Shielding {
        shielded,
        remaining: damage - shielded,
        cf_remaining,
    })
}

/// One minefield's removal roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearanceRoll {
    pub roll: Roll2d6,
    pub clear_tn: u8,
    pub swept: bool,
}

/// Subject every minefield in the hex to an independent removal roll,
/// deleting the ones that are swept
pub fn clear_minefields(world: &mut World, coord: HexCoord, dice: &mut Dice) -> Vec<ClearanceRoll> {
    let fields = world.board.minefields_at(coord).to_vec();
    let mut rolls = Vec::with_capacity(fields.len());
    let mut swept_indices = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let roll = dice.roll_2d6();
        let swept = roll.total >= field.clear_tn;
        if swept {
            swept_indices.push(index);
        }
        rolls.push(ClearanceRoll {
            roll,
            clear_tn: field.clear_tn,
            swept,
        });
    }

    // Remove from the back so earlier indices stay valid
    for &index in swept_indices.iter().rev() {
        world.board.remove_minefield(coord, index);
    }

    rolls
}

/// Result of trying to set a hex alight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionAttempt {
    /// Nothing in the hex can burn (or it already does)
    NotFlammable,
    Rolled { roll: Roll2d6, started: bool },
}

/// Roll against a weapon's fire target number to ignite a hex
pub fn attempt_ignition(
    world: &mut World,
    coord: HexCoord,
    fire_tn: u8,
    dice: &mut Dice,
) -> IgnitionAttempt {
    if !world.board.hex(coord).is_flammable() {
        return IgnitionAttempt::NotFlammable;
    }
    let roll = dice.roll_2d6();
    let started = roll.total >= fire_tn && world.ignite_hex(coord);
    IgnitionAttempt::Rolled { roll, started }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameOptions;
    use crate::world::{Hex, Minefield, Structure};

    #[test]
    fn test_absorption_caps_at_incoming_damage() {
        let mut world = World::new(GameOptions::default());
        let coord = HexCoord::new(1, 1);
        world.board.set_hex(coord, Hex::woods(3));

        // 6 points of absorption against a 4-point hit
        let result = absorb_terrain(&mut world, coord, 4, false);
        assert_eq!(result.absorbed, 4);
        assert_eq!(result.remaining, 0);

        let result = absorb_terrain(&mut world, coord, 20, false);
        assert_eq!(result.absorbed, 6);
        assert_eq!(result.remaining, 14);
    }

    #[test]
    fn test_capital_fire_ignores_foliage() {
        let mut world = World::new(GameOptions::default());
        let coord = HexCoord::new(1, 1);
        world.board.set_hex(coord, Hex::woods(3));

        let result = absorb_terrain(&mut world, coord, 10, true);
        assert_eq!(result.absorbed, 0);
        assert_eq!(result.remaining, 10);
    }

    #[test]
    fn test_absorption_thins_woods_eventually() {
        let mut world = World::new(GameOptions::default());
        let coord = HexCoord::new(0, 2);
        world.board.set_hex(coord, Hex::woods(1));

        let mut thinned = false;
        for _ in 0..25 {
            thinned |= absorb_terrain(&mut world, coord, 2, false).thinned;
        }
        assert!(thinned);
        assert_eq!(world.board.hex(coord).woods_level, 0);
    }

    #[test]
    fn test_structure_shielding() {
        let mut world = World::new(GameOptions::default());
        let coord = HexCoord::new(2, 0);
        world.board.add_structure(coord, Structure::new(40));

        let shielding = shield_by_structure(&mut world, coord, 10).unwrap();
        assert_eq!(shielding.shielded, 4);
        assert_eq!(shielding.remaining, 6);
        assert_eq!(shielding.cf_remaining, 36);

        assert!(shield_by_structure(&mut world, HexCoord::new(9, 9), 10).is_none());
    }

    #[test]
    fn test_minefield_clearance_rolls_each_field() {
        let mut world = World::new(GameOptions::default());
        let coord = HexCoord::new(3, 3);
        world.board.add_minefield(coord, Minefield { clear_tn: 6, density: 10 });
        world.board.add_minefield(coord, Minefield { clear_tn: 10, density: 10 });

        // First roll 8 (sweeps TN 6), second roll 5 (misses TN 10)
        let mut dice = Dice::scripted(vec![4, 4, 2, 3]);
        let rolls = clear_minefields(&mut world, coord, &mut dice);
        assert_eq!(rolls.len(), 2);
        assert!(rolls[0].swept);
        assert!(!rolls[1].swept);
        assert_eq!(world.board.minefields_at(coord).len(), 1);
        assert_eq!(world.board.minefields_at(coord)[0].clear_tn, 10);
    }

    #[test]
    fn test_ignition_needs_flammable_hex_and_roll() {
        let mut world = World::new(GameOptions::default());
        let clear_coord = HexCoord::new(0, 0);
        let woods_coord = HexCoord::new(1, 0);
        world.board.set_hex(woods_coord, Hex::woods(1));

        let mut dice = Dice::scripted(vec![5, 4]);
        assert_eq!(
            attempt_ignition(&mut world, clear_coord, 7, &mut dice),
            IgnitionAttempt::NotFlammable
        );

        match attempt_ignition(&mut world, woods_coord, 7, &mut dice) {
            IgnitionAttempt::Rolled { roll, started } => {
                assert_eq!(roll.total, 9);
                assert!(started);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(world.board.hex(woods_coord).on_fire);

        // A burning hex is no longer flammable
        assert_eq!(
            attempt_ignition(&mut world, woods_coord, 7, &mut dice),
            IgnitionAttempt::NotFlammable
        );
    }
}
