use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod wasm;

pub use error::{MoveError, SessionError, SnapshotError, StateError};
pub use game::GameState;
pub use types::{Move, MoveOutcome, Piece, Player, Position, Rank, Winner};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
