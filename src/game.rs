use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::{BOARD_SIZE, Board};
use crate::error::{MoveError, StateError};
use crate::rules;
use crate::types::{Move, MoveOutcome, Piece, Player, Position, Rank, Winner};

/// Complete state of one game: the board plus turn metadata.
///
/// The surrounding session owns the single live value and round-trips it
/// between requests; the engine keeps nothing else. Deserializing runs
/// [`GameState::validate`], so a loaded state always upholds its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredGameState")]
pub struct GameState {
    board: Board,
    current_player: Player,
    game_over: bool,
    winner: Option<Winner>,
    /// Contract: `true` only while a capture chain is in progress.
    must_capture: bool,
    /// Landing square of the piece that must keep jumping.
    /// Contract: `Some` exactly when `must_capture` is `true`.
    continuation: Option<Position>,
}

/// Durable form as written by other hosts, before validation.
#[derive(Deserialize)]
struct StoredGameState {
    board: Board,
    current_player: Player,
    game_over: bool,
    winner: Option<Winner>,
    must_capture: bool,
    #[serde(default)]
    continuation: Option<Position>,
}

impl TryFrom<StoredGameState> for GameState {
    type Error = StateError;

    /// A chain saved without its landing square is resumed only when exactly
    /// one piece of the side to move can jump.
    fn try_from(stored: StoredGameState) -> Result<Self, Self::Error> {
        let mut continuation = stored.continuation;
        if stored.must_capture && continuation.is_none() && !stored.game_over {
            let mut jumpers = stored
                .board
                .squares_of(stored.current_player)
                .filter(|&pos| rules::has_further_capture(&stored.board, pos));
            if let (Some(only), None) = (jumpers.next(), jumpers.next()) {
                continuation = Some(only);
            }
        }

        let state = Self {
            board: stored.board,
            current_player: stored.current_player,
            game_over: stored.game_over,
            winner: stored.winner,
            must_capture: stored.must_capture,
            continuation,
        };
        state.validate()?;
        Ok(state)
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::from_position(Board::new(), Player::One)
    }

    /// Starts from an arbitrary position with `to_move` on turn.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        Self {
            board,
            current_player: to_move,
            game_over: false,
            winner: None,
            must_capture: false,
            continuation: None,
        }
    }

    pub(crate) fn from_parts(
        board: Board,
        current_player: Player,
        winner: Option<Winner>,
        continuation: Option<Position>,
    ) -> Self {
        Self {
            board,
            current_player,
            game_over: winner.is_some(),
            winner,
            must_capture: continuation.is_some(),
            continuation,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn must_capture(&self) -> bool {
        self.must_capture
    }

    pub fn continuation(&self) -> Option<Position> {
        self.continuation
    }

    /// Checks the cross-field invariants of a state received from outside.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.game_over != self.winner.is_some() {
            return Err(StateError::GameOverMismatch);
        }
        if self.must_capture != self.continuation.is_some() {
            return Err(StateError::ChainFlagMismatch);
        }
        if let Some(at) = self.continuation {
            if self.game_over {
                return Err(StateError::ChainAfterGameOver);
            }
            if !on_board(at) {
                return Err(StateError::ContinuationOffBoard {
                    row: at.row,
                    col: at.col,
                });
            }
            if !self
                .board
                .get(at)
                .is_some_and(|p| p.owner == self.current_player)
            {
                return Err(StateError::ContinuationWithoutPiece(at));
            }
            if !rules::has_further_capture(&self.board, at) {
                return Err(StateError::ContinuationWithoutCapture(at));
            }
        }
        Ok(())
    }

    /// Whether `mv` has a legal shape and target, ignoring turn order.
    pub fn is_legal_move(&self, mv: Move) -> bool {
        in_range(mv).is_ok() && rules::is_legal_move(&self.board, mv)
    }

    pub fn has_further_capture(&self, pos: Position) -> bool {
        on_board(pos) && rules::has_further_capture(&self.board, pos)
    }

    pub fn player_has_forced_capture(&self, player: Player) -> bool {
        rules::player_has_forced_capture(&self.board, player)
    }

    /// Validates and applies one move for the player on turn.
    ///
    /// Rejections leave the state untouched. An accepted capture that leaves
    /// the same piece another jump keeps the turn and returns
    /// [`MoveOutcome::ContinueCapture`], unless the piece was just crowned.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        let result = self.try_apply(mv);
        match &result {
            Ok(MoveOutcome::ContinueCapture { at }) => {
                debug!("{} captured with {mv}, must continue from {at}", self.current_player)
            }
            Ok(MoveOutcome::TurnPassed) => debug!("accepted {mv}, {} to move", self.current_player),
            Err(err) => debug!("rejected {mv}: {err}"),
        }
        result
    }

    /// Same as [`GameState::apply_move`] for raw, unchecked coordinates.
    pub fn apply_coords(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<MoveOutcome, MoveError> {
        let from = Position::try_from_coords(from_row, from_col)?;
        let to = Position::try_from_coords(to_row, to_col)?;
        self.apply_move(Move::new(from, to))
    }

    fn try_apply(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        in_range(mv)?;
        if self.game_over {
            return Err(MoveError::GameOver);
        }

        let piece = match self.board.get(mv.from) {
            Some(piece) if piece.owner == self.current_player => piece,
            _ => return Err(MoveError::NotYourPiece),
        };

        let capturing = rules::is_capturing_move(mv);
        if self.must_capture && (!capturing || self.continuation != Some(mv.from)) {
            return Err(MoveError::MustContinueCapture);
        }
        if !capturing && rules::player_has_forced_capture(&self.board, self.current_player) {
            return Err(MoveError::CaptureIsMandatory);
        }
        if !rules::is_legal_move(&self.board, mv) {
            return Err(MoveError::IllegalMove);
        }

        self.board.relocate(mv.from, mv.to);
        if capturing {
            self.board.set(rules::midpoint(mv), None);
        }

        let promoted = piece.rank == Rank::Man && mv.to.row == piece.owner.promotion_row();
        if promoted {
            self.board.set(mv.to, Some(Piece::king(piece.owner)));
        }

        // a freshly crowned king never keeps jumping
        if !promoted && capturing && rules::has_further_capture(&self.board, mv.to) {
            self.must_capture = true;
            self.continuation = Some(mv.to);
            return Ok(MoveOutcome::ContinueCapture { at: mv.to });
        }

        self.end_turn();
        Ok(MoveOutcome::TurnPassed)
    }

    fn end_turn(&mut self) {
        self.current_player = self.current_player.opponent();
        self.must_capture = false;
        self.continuation = None;
        self.check_game_over();
    }

    /// Piece-count wins are decided before mobility.
    fn check_game_over(&mut self) {
        let (one, two) = self.board.count();
        let winner = if two == 0 {
            Winner::Player(Player::One)
        } else if one == 0 {
            Winner::Player(Player::Two)
        } else if !rules::player_has_any_move(&self.board, self.current_player) {
            Winner::Draw
        } else {
            return;
        };

        info!("game over: {winner:?} ({one} vs {two} pieces)");
        self.game_over = true;
        self.winner = Some(winner);
    }

    /// Destinations the piece on `pos` may move to, for highlighting.
    ///
    /// Empty for empty or opposing squares, for finished games and, during a
    /// capture chain, for every square but the chaining piece. Captures
    /// shadow simple steps for the queried piece.
    pub fn legal_destinations(&self, pos: Position) -> Vec<Position> {
        if self.game_over || !on_board(pos) {
            return Vec::new();
        }
        if self.continuation.is_some_and(|at| at != pos) {
            return Vec::new();
        }
        match self.board.get(pos) {
            Some(piece) if piece.owner == self.current_player => {
                rules::piece_destinations(&self.board, pos)
            }
            _ => Vec::new(),
        }
    }

    /// Every move the player on turn may submit, with captures forced
    /// across the whole board.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.game_over {
            return Vec::new();
        }
        if let Some(at) = self.continuation {
            return rules::capture_targets(&self.board, at)
                .into_iter()
                .map(|to| Move::new(at, to))
                .collect();
        }

        let forced = rules::player_has_forced_capture(&self.board, self.current_player);
        self.board
            .squares_of(self.current_player)
            .flat_map(|from| {
                let targets = if forced {
                    rules::capture_targets(&self.board, from)
                } else {
                    rules::step_targets(&self.board, from)
                };
                targets.into_iter().map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Squares holding a piece with at least one entry in `legal_moves`.
    pub fn movable_pieces(&self) -> Vec<Position> {
        let mut out: Vec<Position> = Vec::new();
        for mv in self.legal_moves() {
            if out.last() != Some(&mv.from) {
                out.push(mv.from);
            }
        }
        out
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn on_board(pos: Position) -> bool {
    (pos.row as usize) < BOARD_SIZE && (pos.col as usize) < BOARD_SIZE
}

fn in_range(mv: Move) -> Result<(), MoveError> {
    for pos in [mv.from, mv.to] {
        if !on_board(pos) {
            return Err(MoveError::OutOfRange {
                row: pos.row.into(),
                col: pos.col.into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_MAN: Piece = Piece::man(Player::One);
    const TWO_MAN: Piece = Piece::man(Player::Two);
    const ONE_KING: Piece = Piece::king(Player::One);
    const TWO_KING: Piece = Piece::king(Player::Two);

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn mv(fr: u8, fc: u8, tr: u8, tc: u8) -> Move {
        Move::new(pos(fr, fc), pos(tr, tc))
    }

    fn state_with(pieces: &[(Position, Piece)], to_move: Player) -> GameState {
        GameState::from_position(Board::with_pieces(pieces), to_move)
    }

    /// Player one at (2,1) can jump (3,2) and then (5,4).
    fn double_jump() -> GameState {
        state_with(
            &[
                (pos(2, 1), ONE_MAN),
                (pos(3, 2), TWO_MAN),
                (pos(5, 4), TWO_MAN),
                (pos(0, 7), ONE_MAN),
                (pos(7, 0), TWO_MAN),
            ],
            Player::One,
        )
    }

    #[test]
    fn initial_state_is_correct() {
        let state = GameState::new();

        assert_eq!(state.current_player(), Player::One);
        assert!(!state.must_capture());
        assert!(!state.is_game_over());
        assert_eq!(state.winner(), None);
        assert_eq!(state.continuation(), None);
        assert_eq!(state.board().count(), (12, 12));
        assert_eq!(state.legal_moves().len(), 7);
        assert_eq!(state.validate(), Ok(()));
    }

    #[test]
    fn simple_step_passes_turn_and_repeat_is_not_your_piece() {
        let mut state = GameState::new();

        let outcome = state.apply_move(mv(2, 1, 3, 2)).unwrap();

        assert_eq!(outcome, MoveOutcome::TurnPassed);
        assert!(!outcome.continues());
        assert_eq!(state.current_player(), Player::Two);
        assert_eq!(state.board().get(pos(3, 2)), Some(ONE_MAN));
        assert_eq!(state.board().get(pos(2, 1)), None);

        assert_eq!(state.apply_move(mv(2, 1, 3, 2)), Err(MoveError::NotYourPiece));
    }

    #[test]
    fn moving_an_opponent_or_empty_square_is_not_your_piece() {
        let mut state = GameState::new();

        assert_eq!(state.apply_move(mv(5, 0, 4, 1)), Err(MoveError::NotYourPiece));
        assert_eq!(state.apply_move(mv(3, 0, 4, 1)), Err(MoveError::NotYourPiece));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut state = GameState::new();
        let before = state.clone();

        assert_eq!(
            state.apply_coords(2, 1, 3, -1),
            Err(MoveError::OutOfRange { row: 3, col: -1 })
        );
        assert_eq!(
            state.apply_coords(8, 0, 7, 1),
            Err(MoveError::OutOfRange { row: 8, col: 0 })
        );
        assert_eq!(
            state.apply_move(mv(2, 1, 3, 9)),
            Err(MoveError::OutOfRange { row: 3, col: 9 })
        );
        assert!(state.legal_destinations(pos(9, 9)).is_empty());
        assert!(!state.is_legal_move(mv(2, 1, 8, 8)));
        assert_eq!(state, before);
    }

    #[test]
    fn illegal_shapes_are_rejected_without_changes() {
        let mut state = GameState::new();
        let before = state.clone();

        assert_eq!(state.apply_move(mv(2, 1, 3, 1)), Err(MoveError::IllegalMove));
        assert_eq!(state.apply_move(mv(2, 1, 4, 1)), Err(MoveError::IllegalMove));
        assert_eq!(state.apply_move(mv(1, 0, 2, 1)), Err(MoveError::IllegalMove));
        assert_eq!(state, before);
    }

    #[test]
    fn capture_is_mandatory_when_any_piece_can_jump() {
        let mut state = state_with(
            &[
                (pos(2, 1), ONE_MAN),
                (pos(3, 2), TWO_MAN),
                (pos(2, 5), ONE_MAN),
                (pos(7, 0), TWO_MAN),
            ],
            Player::One,
        );
        let before = state.clone();

        assert!(state.player_has_forced_capture(Player::One));
        assert_eq!(state.apply_move(mv(2, 5, 3, 6)), Err(MoveError::CaptureIsMandatory));
        assert_eq!(state.apply_move(mv(2, 1, 3, 0)), Err(MoveError::CaptureIsMandatory));
        assert_eq!(state, before);

        assert_eq!(state.apply_move(mv(2, 1, 4, 3)), Ok(MoveOutcome::TurnPassed));
        assert_eq!(state.board().get(pos(3, 2)), None);
        assert_eq!(state.board().count(), (2, 1));
    }

    #[test]
    fn capture_chain_keeps_the_turn_on_the_landing_square() {
        let mut state = double_jump();

        let outcome = state.apply_move(mv(2, 1, 4, 3)).unwrap();

        assert_eq!(outcome, MoveOutcome::ContinueCapture { at: pos(4, 3) });
        assert!(outcome.continues());
        assert_eq!(outcome.continuation(), Some(pos(4, 3)));
        assert_eq!(state.current_player(), Player::One);
        assert!(state.must_capture());
        assert_eq!(state.continuation(), Some(pos(4, 3)));
        assert_eq!(state.validate(), Ok(()));

        let mid_chain = state.clone();
        assert_eq!(state.apply_move(mv(4, 3, 5, 2)), Err(MoveError::MustContinueCapture));
        assert_eq!(state.apply_move(mv(0, 7, 1, 6)), Err(MoveError::MustContinueCapture));
        assert_eq!(state, mid_chain);

        assert_eq!(state.apply_move(mv(4, 3, 6, 5)), Ok(MoveOutcome::TurnPassed));
        assert_eq!(state.current_player(), Player::Two);
        assert!(!state.must_capture());
        assert_eq!(state.continuation(), None);
        assert_eq!(state.board().count(), (2, 1));
    }

    #[test]
    fn only_the_chaining_piece_may_capture_mid_chain() {
        let mut state = state_with(
            &[
                (pos(2, 1), ONE_MAN),
                (pos(3, 2), TWO_MAN),
                (pos(5, 4), TWO_MAN),
                (pos(2, 5), ONE_MAN),
                (pos(3, 6), TWO_MAN),
            ],
            Player::One,
        );

        state.apply_move(mv(2, 1, 4, 3)).unwrap();

        assert_eq!(state.apply_move(mv(2, 5, 4, 7)), Err(MoveError::MustContinueCapture));
        assert_eq!(state.legal_destinations(pos(2, 5)), Vec::<Position>::new());
        assert_eq!(state.legal_destinations(pos(4, 3)), vec![pos(6, 5)]);
        assert_eq!(state.legal_moves(), vec![mv(4, 3, 6, 5)]);
    }

    #[test]
    fn man_reaching_last_row_is_crowned_and_ends_turn() {
        let mut state = state_with(&[(pos(6, 1), ONE_MAN), (pos(2, 3), TWO_MAN)], Player::One);

        assert_eq!(state.apply_move(mv(6, 1, 7, 2)), Ok(MoveOutcome::TurnPassed));

        assert_eq!(state.board().get(pos(7, 2)), Some(ONE_KING));
        assert_eq!(state.current_player(), Player::Two);
    }

    #[test]
    fn promotion_ends_turn_even_with_another_jump_available() {
        // after crowning on (7,2) the king could jump (6,3) back to (5,4)
        let mut state = state_with(
            &[
                (pos(5, 0), ONE_MAN),
                (pos(6, 1), TWO_MAN),
                (pos(6, 3), TWO_MAN),
            ],
            Player::One,
        );

        let outcome = state.apply_move(mv(5, 0, 7, 2)).unwrap();

        assert_eq!(outcome, MoveOutcome::TurnPassed);
        assert_eq!(state.board().get(pos(7, 2)), Some(ONE_KING));
        assert!(state.board().get(pos(6, 3)).is_some());
        assert!(state.has_further_capture(pos(7, 2)));
        assert_eq!(state.current_player(), Player::Two);
        assert!(!state.must_capture());
    }

    #[test]
    fn player_two_crowns_on_row_zero() {
        let mut state = state_with(&[(pos(1, 2), TWO_MAN), (pos(5, 0), ONE_MAN)], Player::Two);

        state.apply_move(mv(1, 2, 0, 1)).unwrap();

        assert_eq!(state.board().get(pos(0, 1)), Some(TWO_KING));
    }

    #[test]
    fn kings_are_not_promoted_again_and_may_jump_backwards() {
        let mut state = state_with(
            &[(pos(4, 3), TWO_KING), (pos(5, 4), ONE_MAN), (pos(0, 1), ONE_MAN)],
            Player::Two,
        );

        assert_eq!(state.apply_move(mv(4, 3, 6, 5)), Ok(MoveOutcome::TurnPassed));
        assert_eq!(state.board().get(pos(6, 5)), Some(TWO_KING));
    }

    #[test]
    fn capturing_the_last_piece_wins() {
        let mut state = state_with(&[(pos(2, 1), ONE_MAN), (pos(3, 2), TWO_MAN)], Player::One);

        state.apply_move(mv(2, 1, 4, 3)).unwrap();

        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(Winner::Player(Player::One)));
        assert_eq!(state.validate(), Ok(()));
    }

    #[test]
    fn player_two_wins_by_capture_too() {
        let mut state = state_with(&[(pos(4, 3), TWO_MAN), (pos(3, 2), ONE_MAN)], Player::Two);

        state.apply_move(mv(4, 3, 2, 1)).unwrap();

        assert_eq!(state.winner(), Some(Winner::Player(Player::Two)));
    }

    #[test]
    fn side_to_move_without_moves_is_a_draw() {
        let mut state = state_with(&[(pos(1, 2), ONE_KING), (pos(1, 0), TWO_MAN)], Player::One);

        // the king backs into (0,1), the only square left to player two
        assert_eq!(state.apply_move(mv(1, 2, 0, 1)), Ok(MoveOutcome::TurnPassed));

        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(Winner::Draw));
        assert_eq!(state.board().count(), (1, 1));
    }

    #[test]
    fn finished_game_accepts_nothing() {
        let mut state = state_with(&[(pos(2, 1), ONE_MAN), (pos(3, 2), TWO_MAN)], Player::One);
        state.apply_move(mv(2, 1, 4, 3)).unwrap();
        let finished = state.clone();

        assert_eq!(state.apply_move(mv(4, 3, 5, 4)), Err(MoveError::GameOver));
        assert!(state.legal_moves().is_empty());
        assert!(state.legal_destinations(pos(4, 3)).is_empty());
        assert_eq!(state, finished);
    }

    #[test]
    fn legal_destinations_follow_ownership_and_direction() {
        let state = GameState::new();

        assert_eq!(state.legal_destinations(pos(2, 1)), vec![pos(3, 0), pos(3, 2)]);
        assert_eq!(state.legal_destinations(pos(2, 7)), vec![pos(3, 6)]);
        assert!(state.legal_destinations(pos(1, 0)).is_empty());
        assert!(state.legal_destinations(pos(5, 0)).is_empty());
        assert!(state.legal_destinations(pos(3, 0)).is_empty());
    }

    #[test]
    fn single_piece_query_shows_only_its_own_captures() {
        let state = state_with(
            &[
                (pos(2, 1), ONE_MAN),
                (pos(3, 2), TWO_MAN),
                (pos(2, 5), ONE_MAN),
            ],
            Player::One,
        );

        assert_eq!(state.legal_destinations(pos(2, 1)), vec![pos(4, 3)]);
        // this piece cannot capture, so its steps are listed even though the
        // move would be refused while another capture exists
        assert_eq!(state.legal_destinations(pos(2, 5)), vec![pos(3, 4), pos(3, 6)]);
        assert_eq!(state.legal_moves(), vec![mv(2, 1, 4, 3)]);
        assert_eq!(state.movable_pieces(), vec![pos(2, 1)]);
    }

    #[test]
    fn every_listed_move_is_accepted() {
        let mut state = GameState::new();
        // play a fixed line, always taking the first listed move
        for _ in 0..40 {
            let moves = state.legal_moves();
            if moves.is_empty() {
                assert!(state.is_game_over());
                break;
            }
            for &candidate in &moves {
                let mut trial = state.clone();
                assert!(trial.apply_move(candidate).is_ok(), "{candidate} rejected");
            }
            state.apply_move(moves[0]).unwrap();
            assert_eq!(state.validate(), Ok(()));
        }
    }

    #[test]
    fn validate_rejects_inconsistent_chain_flags() {
        let mut state = double_jump();
        state.apply_move(mv(2, 1, 4, 3)).unwrap();

        let mut broken = state.clone();
        broken.continuation = None;

        assert_eq!(broken.validate(), Err(StateError::ChainFlagMismatch));

        let mut stale = state.clone();
        stale.board.set(pos(5, 4), None);
        assert_eq!(
            stale.validate(),
            Err(StateError::ContinuationWithoutCapture(pos(4, 3)))
        );
    }

    #[test]
    fn serde_round_trip_preserves_meaning() {
        let mut state = double_jump();
        state.apply_move(mv(2, 1, 4, 3)).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
        assert!(json.contains("\"current_player\":1"));
        assert!(json.contains("\"winner\":null"));
        assert!(json.contains("\"must_capture\":true"));
    }

    #[test]
    fn serde_encodes_board_as_cell_codes_and_draw_as_zero() {
        let finished = GameState::from_parts(Board::empty(), Player::Two, Some(Winner::Draw), None);

        let value = serde_json::to_value(&finished).unwrap();

        assert_eq!(value["winner"], 0);
        assert_eq!(value["game_over"], true);
        assert_eq!(value["board"][0][1], 0);
        assert_eq!(value["board"].as_array().unwrap().len(), 8);

        let initial = serde_json::to_value(GameState::new()).unwrap();
        assert_eq!(initial["board"][0][1], 1);
        assert_eq!(initial["board"][7][0], 2);
    }

    #[test]
    fn deserializing_unknown_cell_codes_fails() {
        let mut value = serde_json::to_value(GameState::new()).unwrap();
        value["board"][3][0] = 7.into();

        assert!(serde_json::from_value::<GameState>(value).is_err());
    }

    /// Mid-chain state with the landing square dropped, as written by a
    /// host that only stores the flag.
    fn chain_without_square(extra: &[(Position, Piece)]) -> serde_json::Value {
        let mut pieces = vec![
            (pos(2, 1), ONE_MAN),
            (pos(3, 2), TWO_MAN),
            (pos(5, 4), TWO_MAN),
            (pos(7, 0), TWO_MAN),
        ];
        pieces.extend_from_slice(extra);
        let mut state = state_with(&pieces, Player::One);
        state.apply_move(mv(2, 1, 4, 3)).unwrap();

        let mut value = serde_json::to_value(&state).unwrap();
        value.as_object_mut().unwrap().remove("continuation");
        value
    }

    #[test]
    fn missing_continuation_is_restored_from_the_only_jumper() {
        let restored: GameState = serde_json::from_value(chain_without_square(&[])).unwrap();

        assert!(restored.must_capture());
        assert_eq!(restored.continuation(), Some(pos(4, 3)));
        assert_eq!(restored.legal_moves(), vec![mv(4, 3, 6, 5)]);

        let mut next = restored.clone();
        assert_eq!(next.apply_move(mv(4, 3, 6, 5)), Ok(MoveOutcome::TurnPassed));
    }

    #[test]
    fn missing_continuation_with_several_jumpers_fails_to_load() {
        // a second player-one man that can also jump (3,6)
        let value = chain_without_square(&[(pos(2, 5), ONE_MAN), (pos(3, 6), TWO_MAN)]);

        let err = serde_json::from_value::<GameState>(value).unwrap_err();

        assert!(err.to_string().contains("must_capture and continuation disagree"));
    }

    #[test]
    fn off_board_continuation_fails_to_load() {
        let mut value = chain_without_square(&[]);
        value["continuation"] = serde_json::json!({ "row": 200, "col": 3 });

        let err = serde_json::from_value::<GameState>(value).unwrap_err();

        assert!(err.to_string().contains("off the board"));
    }

    #[test]
    fn inconsistent_game_over_fails_to_load() {
        let mut value = serde_json::to_value(GameState::new()).unwrap();
        value["game_over"] = true.into();

        let err = serde_json::from_value::<GameState>(value).unwrap_err();

        assert!(err.to_string().contains("game_over and winner disagree"));
    }
}
