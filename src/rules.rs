use crate::board::Board;
use crate::types::{Move, Piece, Player, Position};

/// Diagonal directions in the order destinations are reported.
pub const DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Whether `piece` may travel with row delta sign `dr`.
/// Kings go anywhere, men only toward the opponent's edge.
fn can_travel(piece: Piece, dr: i8) -> bool {
    piece.is_king() || dr == piece.owner.forward()
}

fn directions_for(piece: Piece) -> impl Iterator<Item = (i8, i8)> {
    DIRECTIONS
        .into_iter()
        .filter(move |&(dr, _)| can_travel(piece, dr))
}

/// Validates the shape and target of a move for the piece on `mv.from`.
/// Ownership and forced capture are checked by the caller.
pub fn is_legal_move(board: &Board, mv: Move) -> bool {
    let Some(piece) = board.get(mv.from) else {
        return false;
    };
    if board.get(mv.to).is_some() {
        return false;
    }

    let dr = mv.to.row as i8 - mv.from.row as i8;
    let dc = mv.to.col as i8 - mv.from.col as i8;

    match (dr.abs(), dc.abs()) {
        (1, 1) => can_travel(piece, dr),
        (2, 2) => {
            let mid = midpoint(mv);
            let jumped = board.get(mid);
            jumped.is_some_and(|j| j.is_opponent_of(piece)) && can_travel(piece, dr.signum())
        }
        _ => false,
    }
}

/// Classifies a move as capture-shaped: exactly two rows and two columns.
/// Says nothing about whether it is currently legal.
pub fn is_capturing_move(mv: Move) -> bool {
    mv.from.row.abs_diff(mv.to.row) == 2 && mv.from.col.abs_diff(mv.to.col) == 2
}

/// Square jumped over by a capture-shaped move.
pub fn midpoint(mv: Move) -> Position {
    Position::new((mv.from.row + mv.to.row) / 2, (mv.from.col + mv.to.col) / 2)
}

/// Landing squares of every jump available to the piece on `pos`.
pub fn capture_targets(board: &Board, pos: Position) -> Vec<Position> {
    let Some(piece) = board.get(pos) else {
        return Vec::new();
    };

    directions_for(piece)
        .filter_map(|(dr, dc)| {
            let over = pos.offset(dr, dc)?;
            let land = pos.offset(dr * 2, dc * 2)?;
            let jumped = board.get(over)?;
            (jumped.is_opponent_of(piece) && board.get(land).is_none()).then_some(land)
        })
        .collect()
}

/// Single-step destinations of the piece on `pos`.
pub fn step_targets(board: &Board, pos: Position) -> Vec<Position> {
    let Some(piece) = board.get(pos) else {
        return Vec::new();
    };

    directions_for(piece)
        .filter_map(|(dr, dc)| pos.offset(dr, dc))
        .filter(|&to| board.get(to).is_none())
        .collect()
}

/// Destinations of one piece: its captures if it has any, else its steps.
pub fn piece_destinations(board: &Board, pos: Position) -> Vec<Position> {
    let captures = capture_targets(board, pos);
    if captures.is_empty() {
        step_targets(board, pos)
    } else {
        captures
    }
}

pub fn has_further_capture(board: &Board, pos: Position) -> bool {
    !capture_targets(board, pos).is_empty()
}

/// Whether any piece of `player` can capture, making captures mandatory.
pub fn player_has_forced_capture(board: &Board, player: Player) -> bool {
    board
        .squares_of(player)
        .any(|pos| has_further_capture(board, pos))
}

/// Whether `player` has any step or jump at all.
pub fn player_has_any_move(board: &Board, player: Player) -> bool {
    board
        .squares_of(player)
        .any(|pos| !piece_destinations(board, pos).is_empty())
}
