use std::fmt;

use serde::{Deserialize, Serialize};

/// Contents of one board cell. Serialized as 0, 1 or 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    #[default]
    Empty,
    Player1,
    Player2,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Player1 => Some(Player::One),
            Cell::Player2 => Some(Player::Two),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Player1 => 1,
            Cell::Player2 => 2,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = InvalidStoneValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Player1),
            2 => Ok(Cell::Player2),
            other => Err(InvalidStoneValue(other)),
        }
    }
}

/// Whoever owns a stone. `Player::default()` is the first player, which is
/// also who a placement belongs to when the caller has no reason to pick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    #[default]
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::Player1,
            Player::Two => Cell::Player2,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        Cell::from(player).into()
    }
}

impl TryFrom<u8> for Player {
    type Error = InvalidStoneValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Cell::try_from(value)?
            .owner()
            .ok_or(InvalidStoneValue(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStoneValue(pub u8);

impl fmt::Display for InvalidStoneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid stone value {}", self.0)
    }
}

impl std::error::Error for InvalidStoneValue {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Every stone of the run that produced a win, ordered from one end of the
/// run to the other. Overlines are reported in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLine {
    pub player: Player,
    pub cells: Vec<Position>,
}

impl WinningLine {
    pub fn new(player: Player, cells: Vec<Position>) -> Self {
        Self { player, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Position> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Position> {
        self.cells.last().copied()
    }
}

/// Result of a placement: the game continues, the mover won, or the board
/// filled up without a winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue,
    Win(WinningLine),
    Draw,
}

impl MoveOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, MoveOutcome::Win(_))
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, MoveOutcome::Draw)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MoveOutcome::Continue)
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        match self {
            MoveOutcome::Win(line) => Some(line),
            _ => None,
        }
    }
}
