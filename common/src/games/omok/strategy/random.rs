use crate::games::SessionRng;
use crate::games::omok::board::Board;
use crate::games::omok::types::Position;

use super::{MoveStrategy, StrategyKind};

/// Uniform choice among the empty cells.
pub struct RandomStrategy<'a> {
    board: &'a Board,
    rng: &'a mut SessionRng,
}

impl<'a> RandomStrategy<'a> {
    pub fn new(board: &'a Board, rng: &'a mut SessionRng) -> Self {
        Self { board, rng }
    }
}

impl MoveStrategy for RandomStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn pick_place(&mut self) -> Option<Position> {
        let candidates = self.board.empty_cells();
        self.rng.choose(&candidates).copied()
    }
}
