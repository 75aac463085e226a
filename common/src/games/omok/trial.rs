use super::board::Board;
use super::error::MoveError;
use super::types::{Player, Position};

/// A stone placed only to look at the resulting position. The cell is
/// emptied again when the guard is dropped, unwinding included.
pub struct TrialPlacement<'a> {
    board: &'a mut Board,
    position: Position,
}

impl<'a> TrialPlacement<'a> {
    pub fn place(
        board: &'a mut Board,
        position: Position,
        player: Player,
    ) -> Result<Self, MoveError> {
        board.place_stone(position.x, position.y, player)?;
        Ok(Self { board, position })
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the trial stone completes a line for `player`.
    pub fn wins_for(&self, player: Player) -> bool {
        self.board
            .check_win(self.position.x, self.position.y, player)
    }
}

impl Drop for TrialPlacement<'_> {
    fn drop(&mut self) {
        self.board.clear_cell(self.position);
    }
}
