mod random;
mod smart;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::games::SessionRng;

use super::board::Board;
use super::types::{Player, Position};

pub use random::RandomStrategy;
pub use smart::SmartStrategy;

/// Picks the computer's next move on the board it was bound to.
pub trait MoveStrategy {
    fn kind(&self) -> StrategyKind;

    /// `None` only when the board has no empty cell left.
    fn pick_place(&mut self) -> Option<Position>;
}

/// The strategies a game can be created with. A game stores only this name;
/// the strategy itself is rebuilt with `bind` on every move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Smart,
    Random,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Smart, StrategyKind::Random];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Smart => "Smart",
            StrategyKind::Random => "Random",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }

    pub fn bind<'a>(
        self,
        board: &'a mut Board,
        player: Player,
        rng: &'a mut SessionRng,
    ) -> Box<dyn MoveStrategy + 'a> {
        match self {
            StrategyKind::Smart => Box::new(SmartStrategy::new(board, player, rng)),
            StrategyKind::Random => Box::new(RandomStrategy::new(board, rng)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown strategy: {}", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
