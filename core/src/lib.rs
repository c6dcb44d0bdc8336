//! Minesweeper game engine.
//!
//! Three pure operations over a [`Grid`] value: generation
//! ([`RandomGridGenerator`]), flood-fill reveal ([`reveal`]) and move
//! application ([`apply_move`]). No I/O, no retained state; callers own the
//! grid and feed it back in for the next move.

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod types;
