use crate::games::SessionRng;
use crate::games::omok::board::Board;
use crate::games::omok::trial::TrialPlacement;
use crate::games::omok::types::{Player, Position};

use super::{MoveStrategy, RandomStrategy, StrategyKind};

/// One-ply lookahead for `player`: take a winning cell if there is one,
/// otherwise block the opponent's winning cell, otherwise play at random.
/// Ties go to the first cell in row-major order.
pub struct SmartStrategy<'a> {
    board: &'a mut Board,
    player: Player,
    rng: &'a mut SessionRng,
}

impl<'a> SmartStrategy<'a> {
    pub fn new(board: &'a mut Board, player: Player, rng: &'a mut SessionRng) -> Self {
        Self { board, player, rng }
    }

    fn find_winning_place(&mut self, mover: Player) -> Option<Position> {
        for position in self.board.empty_cells() {
            let Ok(trial) = TrialPlacement::place(&mut *self.board, position, mover) else {
                continue;
            };
            if trial.wins_for(mover) {
                return Some(position);
            }
        }
        None
    }
}

impl MoveStrategy for SmartStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Smart
    }

    fn pick_place(&mut self) -> Option<Position> {
        if let Some(position) = self.find_winning_place(self.player) {
            return Some(position);
        }
        if let Some(position) = self.find_winning_place(self.player.opponent()) {
            return Some(position);
        }
        let mut fallback = RandomStrategy::new(&*self.board, &mut *self.rng);
        fallback.pick_place()
    }
}
