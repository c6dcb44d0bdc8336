use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{CellState, Coord, Coord2, Grid, Result};

/// A single player action against a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Reveal { row: Coord, col: Coord },
    Flag { row: Coord, col: Coord },
}

impl Move {
    pub const fn coords(self) -> Coord2 {
        match self {
            Self::Reveal { row, col } => (row, col),
            Self::Flag { row, col } => (row, col),
        }
    }
}

/// Terminal flags derived from grid content alone, never stored.
///
/// A grid is self-describing: a lost game already has every bomb opened and
/// a won game has every safe cell opened, so recomputing from scratch after
/// each move always agrees with history.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub is_game_over: bool,
    pub is_game_won: bool,
}

impl GameStatus {
    pub fn derive(grid: &Grid) -> Self {
        let exploded = grid.has_opened_bomb();
        let won = !exploded && grid.all_safe_cells_opened();
        Self {
            is_game_over: exploded || won,
            is_game_won: won,
        }
    }
}

/// New grid plus derived status; ownership transfers to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub grid: Grid,
    pub is_game_over: bool,
    pub is_game_won: bool,
}

/// Opens the cell at `start` and flood-fills the surrounding zero region.
///
/// A zero-valued cell expands to all of its not-yet-opened 8-neighbors;
/// nonzero and bomb cells are opened as leaves and never expanded. Flagged
/// cells reached by the expansion are opened like any other. Already-opened
/// targets are a no-op.
///
/// The recursion of the textbook formulation is restated as an explicit
/// work-list with the grid's own `state` field as the visited check, so
/// large boards cannot exhaust the call stack. Visitation order does not
/// affect the fixed point.
pub fn reveal(grid: &mut Grid, start: Coord2) {
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        if grid[coords].state.is_opened() {
            continue;
        }
        grid[coords].state = CellState::Opened;

        if grid[coords].value.is_zero() {
            let unopened = grid
                .iter_neighbors(coords)
                .filter(|&pos| !grid[pos].state.is_opened());
            to_visit.extend(unopened);
        }
    }
}

/// Applies one move to a clone of `grid` and derives the resulting status.
///
/// The input grid is never mutated. Flagging toggles `Flagged <-> Initial`
/// and is silently ignored on an opened cell. Revealing an opened cell is a
/// no-op. Any reveal that ends up opening a bomb, whether clicked directly
/// or swept up as a flood-fill leaf, forces every bomb on the board open
/// and loses the game.
///
/// Out-of-range coordinates are a caller bug and are rejected instead of
/// corrupting state.
pub fn apply_move(grid: &Grid, mv: Move) -> Result<MoveOutcome> {
    let coords = grid.validate_coords(mv.coords())?;
    let mut next = grid.clone();

    match mv {
        Move::Flag { .. } => {
            let cell = &mut next[coords];
            cell.state = match cell.state {
                CellState::Initial => CellState::Flagged,
                CellState::Flagged => CellState::Initial,
                CellState::Opened => CellState::Opened,
            };
        }
        Move::Reveal { .. } => {
            reveal(&mut next, coords);
            if next.has_opened_bomb() {
                next.open_all_bombs();
            }
        }
    }

    let GameStatus {
        is_game_over,
        is_game_won,
    } = GameStatus::derive(&next);
    Ok(MoveOutcome {
        grid: next,
        is_game_over,
        is_game_won,
    })
}
