/// Single coordinate axis used for grid size and cell positions.
pub type Coord = u8;

/// Zero-based `(row, col)` position, row-major.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Row/col displacements of the 8-neighborhood: the four orthogonal
/// directions plus the four diagonals.
const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds 8-neighbors of `center` on a square `size`x`size`
/// grid. Out-of-range neighbors are skipped, never wrapped.
pub(crate) fn neighbors(center: Coord2, size: Coord) -> impl Iterator<Item = Coord2> {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(d_row, d_col)| {
        let row = center.0.checked_add_signed(d_row)?;
        let col = center.1.checked_add_signed(d_col)?;
        (row < size && col < size).then_some((row, col))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let all: Vec<Coord2> = neighbors((1, 1), 3).collect();
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&(1, 1)));
    }

    #[test]
    fn corners_and_edges_are_clamped() {
        assert_eq!(neighbors((0, 0), 3).count(), 3);
        assert_eq!(neighbors((0, 1), 3).count(), 5);
        assert_eq!(neighbors((2, 2), 3).count(), 3);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert_eq!(neighbors((0, 0), 1).count(), 0);
    }
}
