use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Side;
use crate::game::{GameEvent, Outcome};
use crate::rules::Move;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Chebyshev (king-move) distance.
    pub fn chebyshev(self, other: Position) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Move as handed to the UI for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveView {
    pub source: Position,
    pub destination: Position,
    pub is_jump: bool,
}

impl From<Move> for MoveView {
    fn from(mv: Move) -> Self {
        Self {
            source: mv.source,
            destination: mv.destination,
            is_jump: mv.is_jump(),
        }
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board_size: u8,
    /// Row-major wire codes: 0=empty, 1=red, 2=blue.
    pub board: Vec<u8>,
    pub current_player: u8,
    pub human_player: u8,
    pub red_count: u16,
    pub blue_count: u16,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the previous action was a pass (no legal move or timeout).
    /// - `false` when the previous action was a move.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: cells flipped by it, as row-major indices.
    /// - Pass: must be an empty list.
    pub flipped: Vec<u16>,
    pub last_move: Option<MoveView>,
    /// Whole seconds left on the human clock; `None` when it is not the
    /// human's turn.
    pub time_remaining_secs: Option<u64>,
}

/// Final result after game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// 1=red, 2=blue, 0=draw.
    pub winner: u8,
    pub red_count: u16,
    pub blue_count: u16,
    pub reason: String,
}

impl GameResult {
    pub fn new(outcome: &Outcome, red_count: usize, blue_count: usize) -> Self {
        Self {
            winner: outcome.winner.map_or(0, Side::code),
            red_count: red_count as u16,
            blue_count: blue_count as u16,
            reason: outcome.reason.to_string(),
        }
    }
}

/// Serialized form of [`GameEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventView {
    BoardChanged { board: Vec<u8> },
    TurnChanged { side: u8 },
    MovesAvailable { side: u8, moves: Vec<MoveView> },
    PassOccurred { side: u8 },
    GameEnded { winner: u8, reason: String },
}

impl From<&GameEvent> for EventView {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::BoardChanged(board) => Self::BoardChanged {
                board: board.to_array(),
            },
            GameEvent::TurnChanged(side) => Self::TurnChanged { side: side.code() },
            GameEvent::MovesAvailable { side, moves } => Self::MovesAvailable {
                side: side.code(),
                moves: moves.iter().copied().map(MoveView::from).collect(),
            },
            GameEvent::PassOccurred(side) => Self::PassOccurred { side: side.code() },
            GameEvent::GameEnded(Outcome { winner, reason }) => Self::GameEnded {
                winner: winner.map_or(0, Side::code),
                reason: reason.to_string(),
            },
        }
    }
}
