use std::fmt;

use omok_common::games::SessionRng;
use omok_common::games::omok::{Board, BoardError, MoveOutcome, Player, Position, StrategyKind};

use crate::session_record::SessionRecord;

/// The person submitting moves always holds the first player's stones.
pub const HUMAN: Player = Player::One;
pub const COMPUTER: Player = Player::Two;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub position: Position,
    pub outcome: MoveOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub ack_move: MoveReport,
    /// Absent when the human's move already ended the game.
    pub computer_move: Option<MoveReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    GameOver,
    InvalidX(isize),
    InvalidY(isize),
    PlaceNotEmpty(Position),
    CorruptRecord(BoardError),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::GameOver => write!(f, "Game over"),
            PlayError::InvalidX(x) => write!(f, "Invalid x coordinate, {}", x),
            PlayError::InvalidY(y) => write!(f, "Invalid y coordinate, {}", y),
            PlayError::PlaceNotEmpty(position) => write!(f, "Place not empty, {}", position),
            PlayError::CorruptRecord(_) => write!(f, "Corrupt game record"),
        }
    }
}

impl std::error::Error for PlayError {}

/// Plays the human's stone at (x, y) and, unless that ended the game, the
/// computer's reply. `record` is only touched when the human's move is
/// accepted.
pub fn play_turn(
    record: &mut SessionRecord,
    x: isize,
    y: isize,
    rng: &mut SessionRng,
) -> Result<TurnReport, PlayError> {
    if record.over {
        return Err(PlayError::GameOver);
    }

    let mut board = record.load_board().map_err(PlayError::CorruptRecord)?;

    if !board.is_within_bounds(x, 0) {
        return Err(PlayError::InvalidX(x));
    }
    if !board.is_within_bounds(x, y) {
        return Err(PlayError::InvalidY(y));
    }

    let position = Position::new(x as usize, y as usize);
    board
        .place_stone(position.x, position.y, HUMAN)
        .map_err(|_| PlayError::PlaceNotEmpty(position))?;

    let ack_move = MoveReport {
        position,
        outcome: board.evaluate_move(position.x, position.y, HUMAN),
    };

    let computer_move = if ack_move.outcome.is_terminal() {
        None
    } else {
        computer_turn(&mut board, record.strategy, rng)
    };

    record.over = ack_move.outcome.is_terminal()
        || computer_move
            .as_ref()
            .is_some_and(|report| report.outcome.is_terminal());
    record.current_player = HUMAN;
    record.store_board(&board);

    Ok(TurnReport {
        ack_move,
        computer_move,
    })
}

fn computer_turn(
    board: &mut Board,
    strategy: StrategyKind,
    rng: &mut SessionRng,
) -> Option<MoveReport> {
    let position = strategy.bind(board, COMPUTER, rng).pick_place()?;
    board.place_stone(position.x, position.y, COMPUTER).ok()?;
    Some(MoveReport {
        position,
        outcome: board.evaluate_move(position.x, position.y, COMPUTER),
    })
}
