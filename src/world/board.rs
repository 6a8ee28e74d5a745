//! Battlefield terrain, minefields, and structures

use crate::world::hex::HexCoord;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Accumulated clearing damage that thins woods by one level
pub const CLEARING_DAMAGE_PER_LEVEL: u32 = 50;

/// What grows in a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    Clear,
    Woods,
    Jungle,
}

/// A single battlefield hex
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hex {
    pub terrain: TerrainKind,
    /// Woods/jungle density; 0 for clear ground
    pub woods_level: u8,
    /// Clearing damage absorbed so far at the current level
    pub clearing_damage: u32,
    pub on_fire: bool,
    pub smoke: bool,
}

impl Hex {
    pub fn woods(level: u8) -> Self {
        Self {
            terrain: TerrainKind::Woods,
            woods_level: level,
            ..Self::default()
        }
    }

    pub fn jungle(level: u8) -> Self {
        Self {
            terrain: TerrainKind::Jungle,
            woods_level: level,
            ..Self::default()
        }
    }

    /// Damage the foliage soaks out of a shot passing through
    pub fn absorption(&self) -> u32 {
        match self.terrain {
            TerrainKind::Clear => 0,
            TerrainKind::Woods | TerrainKind::Jungle => 2 * u32::from(self.woods_level),
        }
    }

    /// Whether a fire can take hold here
    pub fn is_flammable(&self) -> bool {
        self.woods_level > 0 && !self.on_fire
    }

    /// Apply clearing damage to the foliage; returns true if it thinned
    /// a level
    pub fn take_clearing_damage(&mut self, amount: u32) -> bool {
        if self.woods_level == 0 {
            return false;
        }
        self.clearing_damage += amount;
        if self.clearing_damage >= CLEARING_DAMAGE_PER_LEVEL {
            self.clearing_damage -= CLEARING_DAMAGE_PER_LEVEL;
            self.woods_level -= 1;
            if self.woods_level == 0 {
                self.terrain = TerrainKind::Clear;
                self.clearing_damage = 0;
            }
            true
        } else {
            false
        }
    }
}

/// A minefield laid in a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minefield {
    /// 2d6 result needed to sweep this field away
    pub clear_tn: u8,
    /// Damage dealt to anything that trips it
    pub density: u8,
}

impl Minefield {
    pub fn conventional() -> Self {
        Self {
            clear_tn: 6,
            density: 10,
        }
    }
}

/// A building occupying a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Current construction factor; the structure collapses at 0
    pub cf: u32,
}

impl Structure {
    pub fn new(cf: u32) -> Self {
        Self { cf }
    }

    /// Damage the structure soaks for an occupant under fire
    pub fn shield_amount(&self) -> u32 {
        self.cf.div_ceil(10)
    }
}

/// The battlefield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    hexes: AHashMap<HexCoord, Hex>,
    minefields: AHashMap<HexCoord, Vec<Minefield>>,
    structures: AHashMap<HexCoord, Structure>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex at a coordinate; unset hexes read as clear ground
    pub fn hex(&self, coord: HexCoord) -> Hex {
        self.hexes.get(&coord).cloned().unwrap_or_default()
    }

    pub fn hex_mut(&mut self, coord: HexCoord) -> &mut Hex {
        self.hexes.entry(coord).or_default()
    }

    pub fn set_hex(&mut self, coord: HexCoord, hex: Hex) {
        self.hexes.insert(coord, hex);
    }

    pub fn minefields_at(&self, coord: HexCoord) -> &[Minefield] {
        self.minefields.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_minefield(&mut self, coord: HexCoord, field: Minefield) {
        self.minefields.entry(coord).or_default().push(field);
    }

    /// Remove one minefield by index; whole-entry cleanup when emptied
    pub fn remove_minefield(&mut self, coord: HexCoord, index: usize) {
        if let Some(fields) = self.minefields.get_mut(&coord) {
            if index < fields.len() {
                fields.remove(index);
            }
            if fields.is_empty() {
                self.minefields.remove(&coord);
            }
        }
    }

    pub fn structure_at(&self, coord: HexCoord) -> Option<Structure> {
        self.structures.get(&coord).copied()
    }

    pub fn add_structure(&mut self, coord: HexCoord, structure: Structure) {
        self.structures.insert(coord, structure);
    }

    /// Reduce a structure's CF, removing it on collapse; returns the CF
    /// remaining
    pub fn damage_structure(&mut self, coord: HexCoord, amount: u32) -> u32 {
        let Some(structure) = self.structures.get_mut(&coord) else {
            return 0;
        };
        structure.cf = structure.cf.saturating_sub(amount);
        let remaining = structure.cf;
        if remaining == 0 {
            self.structures.remove(&coord);
        }
        remaining
    }
}
