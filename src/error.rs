use thiserror::Error;

use crate::board::Side;
use crate::types::Position;

/// Rejections surfaced by the game core. None of them are fatal; a rejected
/// call leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("position out of bounds: ({row}, {col})")]
    OutOfBounds { row: u8, col: u8 },

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("game is already over")]
    GameOver,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid board: {0}")]
    InvalidBoard(String),
}
