//! Fusillade - Turn-Based Ranged Combat Resolution

pub mod attack;
pub mod catalog;
pub mod core;
pub mod dice;
pub mod report;
pub mod rules;
pub mod world;
