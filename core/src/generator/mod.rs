use crate::{Coord, Grid};

pub use random::*;

mod random;

/// Default chance that any given cell holds a bomb.
pub const DEFAULT_BOMB_PROBABILITY: f64 = 0.2;

pub trait GridGenerator {
    fn generate(self, size: Coord) -> Grid;
}
