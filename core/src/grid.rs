use core::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{neighbors, Cell, CellState, Coord, Coord2, GameError, Result, ToNdIndex};

/// Square, row-major board of [`Cell`]s.
///
/// A grid is a plain value: every move clones it and returns a new one, the
/// caller's copy is never touched. Serialization is the nested-array form
/// (`[[{state, value}, ..], ..]`) so the whole board survives a textual
/// round-trip through a query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub(crate) fn from_cells(cells: Array2<Cell>) -> Self {
        debug_assert_eq!(cells.nrows(), cells.ncols());
        Self { cells }
    }

    /// Builds a grid from row-major nested cells, rejecting anything that is
    /// not a square of positive size.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 || size > usize::from(Coord::MAX) {
            return Err(GameError::InvalidGridShape);
        }
        if rows.iter().any(|row| row.len() != size) {
            return Err(GameError::InvalidGridShape);
        }

        let cells = rows.into_iter().flatten().collect();
        let cells =
            Array2::from_shape_vec((size, size), cells).map_err(|_| GameError::InvalidGridShape)?;
        Ok(Self { cells })
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// In-bounds 8-neighbors of `coords`.
    pub fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        neighbors(coords, self.size())
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn bomb_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_bomb()).count()
    }

    pub fn flagged_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.state == CellState::Flagged)
            .count()
    }

    /// Whether no cell has been opened or flagged yet, i.e. the board is a
    /// freshly generated game.
    pub fn is_untouched(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.state == CellState::Initial)
    }

    pub fn has_opened_bomb(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_bomb() && cell.state.is_opened())
    }

    /// Win predicate: every non-bomb cell is opened. Flags never count.
    pub fn all_safe_cells_opened(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_bomb() || cell.state.is_opened())
    }

    /// Forces every bomb cell to `Opened`, the terminal shape of a lost game.
    pub(crate) fn open_all_bombs(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_bomb() {
                cell.state = CellState::Opened;
            }
        }
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut rows = serializer.serialize_seq(Some(self.cells.nrows()))?;
        for row in self.cells.outer_iter() {
            rows.serialize_element(&row.to_vec())?;
        }
        rows.end()
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
