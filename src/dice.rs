//! Dice utility for combat resolution
//!
//! All randomness flows through a single `Dice` value so a battle replays
//! identically from a seed. Tests and replays can substitute a scripted
//! sequence of faces instead of a seeded generator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a 2d6 roll, keeping the individual faces for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll2d6 {
    pub faces: (u8, u8),
    pub total: u8,
}

impl fmt::Display for Roll2d6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} + {})", self.total, self.faces.0, self.faces.1)
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    /// Fixed face sequence, cycling when exhausted
    Scripted { faces: Vec<u8>, next: usize },
}

/// Deterministic dice source
pub struct Dice {
    source: Source,
}

impl Dice {
    /// Dice driven by a seeded generator (deterministic per seed)
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Dice driven by OS entropy
    pub fn from_entropy() -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::from_entropy()),
        }
    }

    /// Dice that replay a fixed sequence of d6 faces, cycling at the end
    ///
    /// A 2d6 roll consumes two faces in order. Faces are clamped to 1..=6.
    pub fn scripted(faces: impl Into<Vec<u8>>) -> Self {
        let mut faces = faces.into();
        if faces.is_empty() {
            faces.push(3);
        }
        Self {
            source: Source::Scripted { faces, next: 0 },
        }
    }

    /// Roll a single six-sided die
    pub fn d6(&mut self) -> u8 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=6),
            Source::Scripted { faces, next } => {
                let face = faces[*next % faces.len()].clamp(1, 6);
                *next += 1;
                face
            }
        }
    }

    /// Roll and sum `count` six-sided dice
    pub fn d6_sum(&mut self, count: u8) -> u32 {
        (0..count).map(|_| u32::from(self.d6())).sum()
    }

    /// Roll 2d6, keeping both faces
    pub fn roll_2d6(&mut self) -> Roll2d6 {
        let a = self.d6();
        let b = self.d6();
        Roll2d6 {
            faces: (a, b),
            total: a + b,
        }
    }
}

impl fmt::Debug for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Seeded(_) => write!(f, "Dice::Seeded"),
            Source::Scripted { faces, next } => {
                write!(f, "Dice::Scripted({} faces, at {})", faces.len(), next)
            }
        }
    }
}
