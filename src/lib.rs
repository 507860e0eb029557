pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod timer;
pub mod types;
pub mod wasm;

pub use board::{Board, Cell, Placement, Side};
pub use config::GameConfig;
pub use error::GameError;
pub use game::{AiTurn, EndReason, GameEvent, GameInstance, MoveSelector, Outcome, Phase};
pub use rules::{Move, generate_moves, is_legal};
pub use types::Position;
