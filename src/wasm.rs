//! Browser bindings. The page keeps the game state and hands it back on
//! every call; nothing is held on the Rust side between calls.

use wasm_bindgen::prelude::*;

use crate::game::GameState;
use crate::snapshot;
use crate::types::{MoveReport, Position};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

/// Deserializing validates the state, so a broken one is thrown here.
fn state_from_js(value: JsValue) -> Result<GameState, JsError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

#[wasm_bindgen]
pub fn new_game() -> Result<JsValue, JsError> {
    to_js(&GameState::new())
}

/// Applies one move and returns a `MoveReport`. Rejections are reported in
/// the `error` field with the state unchanged, not thrown.
#[wasm_bindgen]
pub fn apply_move(
    state: JsValue,
    from_row: i32,
    from_col: i32,
    to_row: i32,
    to_col: i32,
) -> Result<JsValue, JsError> {
    let mut game = state_from_js(state)?;
    let result = game.apply_coords(from_row, from_col, to_row, to_col);

    let report = match result {
        Ok(outcome) => MoveReport {
            state: game,
            accepted: true,
            continues: outcome.continues(),
            continuation: outcome.continuation(),
            error: None,
        },
        Err(err) => MoveReport {
            state: game,
            accepted: false,
            continues: false,
            continuation: None,
            error: Some(err.to_string()),
        },
    };
    to_js(&report)
}

#[wasm_bindgen]
pub fn legal_destinations(state: JsValue, row: i32, col: i32) -> Result<JsValue, JsError> {
    let game = state_from_js(state)?;
    let destinations = match Position::try_from_coords(row, col) {
        Ok(pos) => game.legal_destinations(pos),
        Err(_) => Vec::new(),
    };
    to_js(&destinations)
}

#[wasm_bindgen]
pub fn legal_moves(state: JsValue) -> Result<JsValue, JsError> {
    to_js(&state_from_js(state)?.legal_moves())
}

/// Packs the state into the binary snapshot format for storage.
#[wasm_bindgen]
pub fn encode_state(state: JsValue) -> Result<Vec<u8>, JsError> {
    Ok(snapshot::encode(&state_from_js(state)?))
}

#[wasm_bindgen]
pub fn decode_state(bytes: &[u8]) -> Result<JsValue, JsError> {
    to_js(&snapshot::decode(bytes)?)
}
