use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside the grid")]
    InvalidCoords,
    #[error("Grid rows do not form a square of positive size")]
    InvalidGridShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
