use std::time::Duration;

use serde::Deserialize;

use crate::board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE, Side};
use crate::error::GameError;

const DEFAULT_HUMAN_TIME_LIMIT_SECS: u64 = 20;
const DEFAULT_AI_DELAY_MS: u64 = 800;
const DEFAULT_PASS_NOTICE_MS: u64 = 1500;

/// Settings fixed before a game starts. Every field has a default, so a
/// front-end can send `{}` or just the fields it cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub board_size: u8,
    pub human_time_limit_secs: u64,
    pub human_side: Side,
    /// How long the front-end should show "thinking" before asking for the
    /// AI move. The core never sleeps.
    pub ai_delay_ms: u64,
    /// How long the front-end should show a pass notice.
    pub pass_notice_ms: u64,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(GameError::InvalidConfig(format!(
                "board size must be {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        if self.human_time_limit_secs == 0 {
            return Err(GameError::InvalidConfig(
                "human time limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ai_side(&self) -> Side {
        self.human_side.opponent()
    }

    pub fn human_time_limit(&self) -> Duration {
        Duration::from_secs(self.human_time_limit_secs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            human_time_limit_secs: DEFAULT_HUMAN_TIME_LIMIT_SECS,
            human_side: Side::Red,
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
            pass_notice_ms: DEFAULT_PASS_NOTICE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_puts_human_on_red() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.board_size, 8);
        assert_eq!(config.human_time_limit(), Duration::from_secs(20));
        assert_eq!(config.ai_side(), Side::Blue);
    }

    #[test]
    fn validate_rejects_tiny_board_and_zero_time_limit() {
        let tiny = GameConfig {
            board_size: 3,
            ..GameConfig::default()
        };
        let err = tiny.validate().unwrap_err();
        assert!(err.to_string().contains("board size"));

        let no_clock = GameConfig {
            human_time_limit_secs: 0,
            ..GameConfig::default()
        };
        assert!(matches!(no_clock.validate(), Err(GameError::InvalidConfig(_))));
    }
}
