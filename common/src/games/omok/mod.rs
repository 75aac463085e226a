//! Omok (five in a row) on a fixed 15x15 board.
//!
//! The grid is indexed `grid[x][y]`: `x` picks the row and `y` the column.
//! Nothing here does I/O or keeps state between calls; callers load a grid,
//! play on it, and hand the grid back for storage.

mod board;
mod error;
mod strategy;
mod trial;
mod types;
mod win_detector;

pub use board::Board;
pub use error::{BoardError, MoveError};
pub use strategy::{MoveStrategy, RandomStrategy, SmartStrategy, StrategyKind, UnknownStrategy};
pub use trial::TrialPlacement;
pub use types::{Cell, InvalidStoneValue, MoveOutcome, Player, Position, WinningLine};
