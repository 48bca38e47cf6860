//! Compact binary save format for a [`GameState`].
//!
//! Layout (little endian):
//! - `[0..4]`   magic `CKRS`
//! - `[4..8]`   format version
//! - `[8..12]`  CRC32 of the payload
//! - payload: 64 cell codes (row-major), player on turn, flags
//!   (bit 0 game over, bit 1 must capture), winner, continuation square.

use log::warn;

use crate::board::{BOARD_SIZE, Board, NUM_SQUARES};
use crate::error::{SnapshotError, StateError};
use crate::game::GameState;
use crate::types::{Player, Position, Winner};

const MAGIC: &[u8; 4] = b"CKRS";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 12;
const PAYLOAD_SIZE: usize = NUM_SQUARES + 4;
const SNAPSHOT_SIZE: usize = HEADER_SIZE + PAYLOAD_SIZE;

const FLAG_GAME_OVER: u8 = 0b01;
const FLAG_MUST_CAPTURE: u8 = 0b10;
/// Marks an absent winner or continuation square.
const NONE_BYTE: u8 = 0xFF;

pub fn encode(state: &GameState) -> Vec<u8> {
    let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
    for row in state.board().to_array() {
        payload.extend_from_slice(&row);
    }
    payload.push(state.current_player().into());

    let mut flags = 0u8;
    if state.is_game_over() {
        flags |= FLAG_GAME_OVER;
    }
    if state.must_capture() {
        flags |= FLAG_MUST_CAPTURE;
    }
    payload.push(flags);
    payload.push(state.winner().map_or(NONE_BYTE, u8::from));
    payload.push(
        state
            .continuation()
            .map_or(NONE_BYTE, |at| at.row * BOARD_SIZE as u8 + at.col),
    );

    let mut out = Vec::with_capacity(SNAPSHOT_SIZE);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

pub fn decode(data: &[u8]) -> Result<GameState, SnapshotError> {
    let result = decode_inner(data);
    if let Err(err) = &result {
        warn!("rejected game snapshot: {err}");
    }
    result
}

fn decode_inner(data: &[u8]) -> Result<GameState, SnapshotError> {
    if data.len() != SNAPSHOT_SIZE {
        return Err(SnapshotError::WrongLength {
            expected: SNAPSHOT_SIZE,
            actual: data.len(),
        });
    }
    if &data[0..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let version = read_u32_le(data, 4);
    if version != VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            expected: VERSION,
            actual: version,
        });
    }

    let expected_crc = read_u32_le(data, 8);
    let payload = &data[HEADER_SIZE..];
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(SnapshotError::ChecksumMismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    let mut grid = [[0u8; BOARD_SIZE]; BOARD_SIZE];
    for (row, chunk) in payload[..NUM_SQUARES].chunks_exact(BOARD_SIZE).enumerate() {
        grid[row].copy_from_slice(chunk);
    }
    let board = Board::from_array(grid)?;

    let tail = &payload[NUM_SQUARES..];
    let current_player = Player::try_from(tail[0])?;
    let flags = tail[1];
    if flags & !(FLAG_GAME_OVER | FLAG_MUST_CAPTURE) != 0 {
        return Err(StateError::UnknownFlags(flags).into());
    }

    let winner = match tail[2] {
        NONE_BYTE => None,
        code => Some(Winner::try_from(code)?),
    };
    let continuation = match tail[3] {
        NONE_BYTE => None,
        idx if (idx as usize) < NUM_SQUARES => Some(Position::new(
            idx / BOARD_SIZE as u8,
            idx % BOARD_SIZE as u8,
        )),
        idx => {
            return Err(StateError::ContinuationOffBoard {
                row: idx / BOARD_SIZE as u8,
                col: idx % BOARD_SIZE as u8,
            }
            .into());
        }
    };

    if (flags & FLAG_GAME_OVER != 0) != winner.is_some() {
        return Err(StateError::GameOverMismatch.into());
    }
    if (flags & FLAG_MUST_CAPTURE != 0) != continuation.is_some() {
        return Err(StateError::ChainFlagMismatch.into());
    }

    let state = GameState::from_parts(board, current_player, winner, continuation);
    state.validate()?;
    Ok(state)
}

/// Callers check the length first.
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
