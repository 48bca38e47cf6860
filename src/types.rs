use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::BOARD_SIZE;
use crate::error::{MoveError, StateError};
use crate::game::GameState;

/// One of the two sides. Player one starts on rows 0..=2 and moves toward row 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Row delta of a forward step for a man of this side.
    pub fn forward(self) -> i8 {
        match self {
            Self::One => 1,
            Self::Two => -1,
        }
    }

    /// Row on which a man of this side is promoted.
    pub fn promotion_row(self) -> u8 {
        match self {
            Self::One => 7,
            Self::Two => 0,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        match player {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = StateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(StateError::InvalidPlayer(other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", u8::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Man,
    King,
}

/// A piece on the board, tagged by owner and rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Player,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(owner: Player) -> Self {
        Self {
            owner,
            rank: Rank::Man,
        }
    }

    pub const fn king(owner: Player) -> Self {
        Self {
            owner,
            rank: Rank::King,
        }
    }

    pub fn is_king(self) -> bool {
        self.rank == Rank::King
    }

    pub fn is_opponent_of(self, other: Piece) -> bool {
        self.owner != other.owner
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Validates raw request coordinates, each of which must be in `0..8`.
    pub fn try_from_coords(row: i32, col: i32) -> Result<Self, MoveError> {
        match (u8::try_from(row), u8::try_from(col)) {
            (Ok(r), Ok(c)) if (r as usize) < BOARD_SIZE && (c as usize) < BOARD_SIZE => {
                Ok(Self::new(r, c))
            }
            _ => Err(MoveError::OutOfRange { row, col }),
        }
    }

    /// Moves by `(dr, dc)` steps, returning `None` when leaving the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let on_board = |v: u8| (v as usize) < BOARD_SIZE;
        let row = self.row.checked_add_signed(dr).filter(|&r| on_board(r))?;
        let col = self.col.checked_add_signed(dc).filter(|&c| on_board(c))?;
        Some(Self::new(row, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A move request `(fromRow, fromCol) -> (toRow, toCol)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Final result of a finished game. Serialized as 1, 2 or 0 for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Winner {
    Player(Player),
    Draw,
}

impl From<Winner> for u8 {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player(player) => player.into(),
            Winner::Draw => 0,
        }
    }
}

impl TryFrom<u8> for Winner {
    type Error = StateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Draw),
            other => Player::try_from(other)
                .map(Self::Player)
                .map_err(|_| StateError::InvalidWinner(other)),
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The turn passed to the opponent (or the game ended).
    TurnPassed,
    /// The same piece must jump again from `at`.
    ContinueCapture { at: Position },
}

impl MoveOutcome {
    pub fn continues(self) -> bool {
        matches!(self, Self::ContinueCapture { .. })
    }

    pub fn continuation(self) -> Option<Position> {
        match self {
            Self::ContinueCapture { at } => Some(at),
            Self::TurnPassed => None,
        }
    }
}

/// Move result returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    /// State after the move. Contract: identical to the input when rejected.
    pub state: GameState,
    pub accepted: bool,
    /// Contract:
    /// - `true` only when the same piece must capture again.
    /// - always `false` when `accepted` is `false`.
    pub continues: bool,
    pub continuation: Option<Position>,
    /// Rejection reason, `None` when accepted.
    pub error: Option<String>,
}
