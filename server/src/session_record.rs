use serde::{Deserialize, Serialize};

use omok_common::games::omok::{Board, BoardError, Cell, Player, StrategyKind};

/// What a game looks like at rest: the grid, whose turn it is, and which
/// strategy the computer plays. The strategy is rebuilt from its name on
/// every move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub board: Vec<Vec<Cell>>,
    pub current_player: Player,
    pub strategy: StrategyKind,
    #[serde(default)]
    pub over: bool,
}

impl SessionRecord {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            board: Board::new().to_grid(),
            current_player: Player::One,
            strategy,
            over: false,
        }
    }

    pub fn load_board(&self) -> Result<Board, BoardError> {
        Board::from_grid(self.board.clone())
    }

    pub fn store_board(&mut self, board: &Board) {
        self.board = board.to_grid();
    }
}
