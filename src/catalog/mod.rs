//! Read-only weapon and munition records
//!
//! The catalog is reference data: the resolution engine looks weapons up
//! but never mutates them. A full game would load hundreds of records;
//! this crate ships a canned set covering every resolution family.

pub mod ammo;
pub mod weapon;

pub use ammo::{Munition, PodKind};
pub use weapon::{DamageProfile, RangeBand, RangeBrackets, WeaponFamily, WeaponSpec};
