use once_cell::sync::OnceCell;
use serde::Serialize;
use std::time::Duration;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{AiTurn, GameInstance};
use crate::types::{EventView, MoveView, Position};

static LOGGER: OnceCell<()> = OnceCell::new();

/// Installs the browser console logger once per module instance.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = console_log::init_with_level(log::Level::Info);
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
}

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Game handle for the browser front-end. The front-end owns every timer,
/// delay and animation and drives this object through calls.
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined` or any subset of `GameConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsValue> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let inner = GameInstance::new_with_default_selector(config).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Returns the flipped cell count of the accepted move.
    #[wasm_bindgen(js_name = attemptMove)]
    pub fn attempt_move(&mut self, sr: u8, sc: u8, tr: u8, tc: u8) -> Result<u32, JsValue> {
        let placement = self
            .inner
            .attempt_move(Position::new(sr, sc), Position::new(tr, tc))
            .map_err(to_js_error)?;
        Ok(placement.flipped_count() as u32)
    }

    /// Returns the AI move, or `null` when the AI passed.
    #[wasm_bindgen(js_name = requestAiMove)]
    pub fn request_ai_move(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.request_ai_move().map_err(to_js_error)? {
            AiTurn::Moved(mv) => to_js(&MoveView::from(mv)),
            AiTurn::Passed => Ok(JsValue::NULL),
        }
    }

    /// Feeds milliseconds spent on the human turn; `true` if it timed out.
    #[wasm_bindgen(js_name = timeElapsed)]
    pub fn time_elapsed(&mut self, elapsed_ms: f64) -> bool {
        let elapsed = Duration::try_from_secs_f64(elapsed_ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX);
        self.inner.handle_time_elapsed(elapsed)
    }

    /// Checks the human clock against the wall clock.
    pub fn tick(&mut self) -> bool {
        self.inner.poll_timer()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_state())
    }

    /// Final result, or `null` while the game is running.
    pub fn result(&self) -> Result<JsValue, JsValue> {
        match self.inner.to_game_result() {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        let moves: Vec<MoveView> = self.inner.legal_moves().into_iter().map(MoveView::from).collect();
        to_js(&moves)
    }

    #[wasm_bindgen(js_name = movesFrom)]
    pub fn moves_from(&self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let moves: Vec<MoveView> = self
            .inner
            .moves_from(Position::new(row, col))
            .into_iter()
            .map(MoveView::from)
            .collect();
        to_js(&moves)
    }

    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        let events: Vec<EventView> = self.inner.drain_events().iter().map(EventView::from).collect();
        to_js(&events)
    }

    #[wasm_bindgen(js_name = aiDelayMs)]
    pub fn ai_delay_ms(&self) -> u32 {
        self.inner.config().ai_delay_ms as u32
    }

    #[wasm_bindgen(js_name = passNoticeMs)]
    pub fn pass_notice_ms(&self) -> u32 {
        self.inner.config().pass_notice_ms as u32
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn to_js_error(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
