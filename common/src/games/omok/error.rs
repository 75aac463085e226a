use std::fmt;

use super::types::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A grid that is not `expected` x `expected`. `columns` is the length of
    /// the first row with the wrong width, or `expected` if only the row
    /// count is off.
    DimensionMismatch {
        expected: usize,
        rows: usize,
        columns: usize,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::DimensionMismatch {
                expected,
                rows,
                columns,
            } => write!(
                f,
                "Board size mismatch: expected a {}x{} grid, got {}x{}",
                expected, expected, rows, columns
            ),
        }
    }
}

impl std::error::Error for BoardError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfBounds { x: usize, y: usize },
    Occupied(Position),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfBounds { x, y } => write!(f, "({}, {}) is outside the board", x, y),
            MoveError::Occupied(position) => write!(f, "{} is already occupied", position),
        }
    }
}

impl std::error::Error for MoveError {}
