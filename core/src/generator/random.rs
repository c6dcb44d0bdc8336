use ndarray::Array2;
use rand::prelude::*;

use super::*;
use crate::{neighbors, Cell, Coord, Grid};

/// Seeded generator that places a bomb on each cell independently with the
/// configured probability, then precomputes 8-neighbor adjacency counts.
///
/// The same seed always yields the same grid, so a game is replayable from
/// its seed alone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
    bomb_probability: f64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64, bomb_probability: f64) -> Self {
        if !(0.0..=1.0).contains(&bomb_probability) {
            log::warn!(
                "Bomb probability {} outside [0, 1], clamping",
                bomb_probability
            );
        }
        Self {
            seed,
            bomb_probability: bomb_probability.clamp(0.0, 1.0),
        }
    }

    pub fn with_default_probability(seed: u64) -> Self {
        Self::new(seed, DEFAULT_BOMB_PROBABILITY)
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, size: Coord) -> Grid {
        let size = if size == 0 {
            log::warn!("Grid size 0 requested, generating 1x1 instead");
            1
        } else {
            size
        };
        let dim = usize::from(size);

        // first pass: independent draw per cell, row-major
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let bombs: Array2<bool> =
            Array2::from_shape_simple_fn((dim, dim), || rng.random::<f64>() < self.bomb_probability);

        // second pass: adjacency counts for every non-bomb cell
        let cells = Array2::from_shape_fn((dim, dim), |(row, col)| {
            if bombs[(row, col)] {
                return Cell::bomb();
            }
            let count = neighbors((row as Coord, col as Coord), size)
                .filter(|&(n_row, n_col)| bombs[(usize::from(n_row), usize::from(n_col))])
                .count() as u8;
            Cell::count(count)
        });

        Grid::from_cells(cells)
    }
}
