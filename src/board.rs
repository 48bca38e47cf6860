use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::types::{Piece, Player, Position, Rank};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
/// Rows each side fills at the start of a game.
const SETUP_ROWS: usize = 3;

pub const CELL_EMPTY: u8 = 0;
pub const CELL_ONE_MAN: u8 = 1;
pub const CELL_TWO_MAN: u8 = 2;
pub const CELL_ONE_KING: u8 = 3;
pub const CELL_TWO_KING: u8 = 4;

/// Checkers board. Row 0 is player one's home edge, row 7 player two's.
///
/// Serialized as `[[u8; 8]; 8]` using the `CELL_*` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[[u8; BOARD_SIZE]; BOARD_SIZE]", into = "[[u8; BOARD_SIZE]; BOARD_SIZE]")]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates the initial board: twelve men per side on the dark squares
    /// of the three rows nearest each player's edge.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE {
            let owner = if row < SETUP_ROWS {
                Player::One
            } else if row >= BOARD_SIZE - SETUP_ROWS {
                Player::Two
            } else {
                continue;
            };
            for col in ((row + 1) % 2..BOARD_SIZE).step_by(2) {
                board.cells[row][col] = Some(Piece::man(owner));
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Builds a board from `(position, piece)` pairs. Intended for setting up
    /// positions; later entries overwrite earlier ones.
    pub fn with_pieces(pieces: &[(Position, Piece)]) -> Self {
        let mut board = Self::empty();
        for &(pos, piece) in pieces {
            board.set(pos, Some(piece));
        }
        board
    }

    /// Returns the piece at `pos`. Callers must pass an in-bounds position.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.row as usize][pos.col as usize]
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.cells[pos.row as usize][pos.col as usize] = piece;
    }

    /// Moves whatever is on `from` to `to`, leaving `from` empty.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) {
        let piece = self.get(from);
        self.set(to, piece);
        self.set(from, None);
    }

    /// Returns `(player_one_count, player_two_count)`.
    pub fn count(&self) -> (u8, u8) {
        let mut counts = (0u8, 0u8);
        for piece in self.cells.iter().flatten().flatten() {
            match piece.owner {
                Player::One => counts.0 += 1,
                Player::Two => counts.1 += 1,
            }
        }
        counts
    }

    /// Squares holding a piece owned by `player`, in row-major order.
    pub fn squares_of(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        all_squares().filter(move |&pos| self.get(pos).is_some_and(|p| p.owner == player))
    }

    /// Converts the board to its durable cell-code grid.
    pub fn to_array(&self) -> [[u8; BOARD_SIZE]; BOARD_SIZE] {
        let mut out = [[CELL_EMPTY; BOARD_SIZE]; BOARD_SIZE];
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                out[row][col] = cell_code(*cell);
            }
        }
        out
    }

    pub fn from_array(grid: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, StateError> {
        let mut board = Self::empty();
        for (row, codes) in grid.iter().enumerate() {
            for (col, &code) in codes.iter().enumerate() {
                board.cells[row][col] = piece_from_code(code)
                    .ok_or(StateError::InvalidCell { code, row, col })?;
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<[[u8; BOARD_SIZE]; BOARD_SIZE]> for Board {
    type Error = StateError;

    fn try_from(grid: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, Self::Error> {
        Self::from_array(grid)
    }
}

impl From<Board> for [[u8; BOARD_SIZE]; BOARD_SIZE] {
    fn from(board: Board) -> Self {
        board.to_array()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let ch = match cell {
                    None if is_dark(Position::new(row as u8, col as u8)) => '_',
                    None => '.',
                    Some(Piece { owner: Player::One, rank: Rank::Man }) => 'm',
                    Some(Piece { owner: Player::One, rank: Rank::King }) => 'M',
                    Some(Piece { owner: Player::Two, rank: Rank::Man }) => 'w',
                    Some(Piece { owner: Player::Two, rank: Rank::King }) => 'W',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Playable squares are those with odd `row + col`.
pub fn is_dark(pos: Position) -> bool {
    (pos.row + pos.col) % 2 == 1
}

pub fn all_squares() -> impl Iterator<Item = Position> {
    (0..NUM_SQUARES).map(|idx| Position::new((idx / BOARD_SIZE) as u8, (idx % BOARD_SIZE) as u8))
}

pub fn cell_code(cell: Option<Piece>) -> u8 {
    match cell {
        None => CELL_EMPTY,
        Some(Piece { owner: Player::One, rank: Rank::Man }) => CELL_ONE_MAN,
        Some(Piece { owner: Player::Two, rank: Rank::Man }) => CELL_TWO_MAN,
        Some(Piece { owner: Player::One, rank: Rank::King }) => CELL_ONE_KING,
        Some(Piece { owner: Player::Two, rank: Rank::King }) => CELL_TWO_KING,
    }
}

/// Decodes a cell code. The outer `None` means the code is invalid.
pub fn piece_from_code(code: u8) -> Option<Option<Piece>> {
    match code {
        CELL_EMPTY => Some(None),
        CELL_ONE_MAN => Some(Some(Piece::man(Player::One))),
        CELL_TWO_MAN => Some(Some(Piece::man(Player::Two))),
        CELL_ONE_KING => Some(Some(Piece::king(Player::One))),
        CELL_TWO_KING => Some(Some(Piece::king(Player::Two))),
        _ => None,
    }
}
