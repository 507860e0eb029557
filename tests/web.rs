//! Runs under `wasm-pack test --headless --chrome` only.
#![cfg(target_arch = "wasm32")]

use jumpflip::wasm::{WasmGame, wasm_ready};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn module_reports_ready() {
    assert!(wasm_ready());
}

#[wasm_bindgen_test]
fn undefined_config_starts_default_game() {
    let mut game = WasmGame::new(JsValue::UNDEFINED).unwrap();

    assert_eq!(game.ai_delay_ms(), 800);
    assert!(game.result().unwrap().is_null());
    assert_eq!(game.attempt_move(0, 0, 1, 1).unwrap(), 0);
    assert!(!game.request_ai_move().unwrap().is_null());
}

#[wasm_bindgen_test]
fn illegal_move_surfaces_as_js_error() {
    let mut game = WasmGame::new(JsValue::NULL).unwrap();

    let err = game.attempt_move(0, 0, 0, 5).unwrap_err();

    assert!(err.as_string().unwrap().contains("illegal move"));
}
