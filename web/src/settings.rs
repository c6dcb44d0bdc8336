use demine_core as game;
use serde::{Deserialize, Serialize};

use crate::utils::StorageKey;

pub(crate) const MIN_GRID_SIZE: game::Coord = 5;
pub(crate) const MAX_GRID_SIZE: game::Coord = 20;
pub(crate) const DEFAULT_GRID_SIZE: game::Coord = 9;

/// Clamps a user-supplied board size into the range the UI offers.
pub(crate) fn clamp_grid_size(raw: game::Coord) -> game::Coord {
    raw.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub grid_size: game::Coord,
    pub bomb_probability: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            bomb_probability: game::DEFAULT_BOMB_PROBABILITY,
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "demine:settings:v1";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_is_clamped_to_ui_range() {
        assert_eq!(clamp_grid_size(1), MIN_GRID_SIZE);
        assert_eq!(clamp_grid_size(9), 9);
        assert_eq!(clamp_grid_size(200), MAX_GRID_SIZE);
    }
}
