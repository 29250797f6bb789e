//! Seeded randomness for layouts.
//!
//! The enclosing-circle shuffle and the coincident-point jiggle both draw from
//! a generator with a fixed seed, so the same tree always lays out the same
//! way.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SEED: u64 = 0x00ca_4091;

#[derive(Debug, Clone)]
pub(crate) struct LayoutRng(StdRng);

impl LayoutRng {
    pub(crate) fn new() -> Self {
        Self(StdRng::seed_from_u64(SEED))
    }

    /// A tiny nudge for coincident points.
    pub(crate) fn jiggle(&mut self) -> f64 {
        self.0.gen_range(-0.5..0.5) * 1e-6
    }

    pub(crate) fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}
