use thiserror::Error;

use crate::types::Position;

/// Reasons a move request is rejected. A rejected move never changes the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("coordinate ({row}, {col}) is off the board")]
    OutOfRange { row: i32, col: i32 },
    #[error("the game is already over")]
    GameOver,
    #[error("not your piece")]
    NotYourPiece,
    #[error("must continue capturing with the same piece")]
    MustContinueCapture,
    #[error("a capturing move is available and must be played")]
    CaptureIsMandatory,
    #[error("illegal move")]
    IllegalMove,
}

/// A stored or received game state that breaks the engine's invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid cell code {code} at ({row}, {col})")]
    InvalidCell { code: u8, row: usize, col: usize },
    #[error("invalid player value: {0}")]
    InvalidPlayer(u8),
    #[error("invalid winner value: {0}")]
    InvalidWinner(u8),
    #[error("unknown flag bits {0:#04x}")]
    UnknownFlags(u8),
    #[error("game_over and winner disagree")]
    GameOverMismatch,
    #[error("must_capture and continuation disagree")]
    ChainFlagMismatch,
    #[error("capture chain in a finished game")]
    ChainAfterGameOver,
    #[error("continuation square ({row}, {col}) is off the board")]
    ContinuationOffBoard { row: u8, col: u8 },
    #[error("continuation square {0} has no piece to move")]
    ContinuationWithoutPiece(Position),
    #[error("continuation square {0} has no capture left")]
    ContinuationWithoutCapture(Position),
}

/// Errors raised while decoding a saved game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot has wrong length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("invalid snapshot magic")]
    BadMagic,
    #[error("unsupported snapshot version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },
    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("invalid snapshot data: {0}")]
    Invalid(#[from] StateError),
}

/// Errors surfaced by the select-then-move session flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please select a piece first")]
    NoSelection,
    #[error("invalid piece selection")]
    InvalidSelection,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("stored game is unreadable: {0}")]
    Store(#[from] SnapshotError),
}
