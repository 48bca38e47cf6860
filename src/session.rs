use log::{debug, info};

use crate::error::SessionError;
use crate::game::GameState;
use crate::snapshot;
use crate::types::{Move, MoveOutcome, Position};

/// Durable home of one game between requests.
pub trait GameStore {
    /// Returns the last saved snapshot, if any.
    fn load(&self) -> Option<Vec<u8>>;
    fn save(&mut self, snapshot: Vec<u8>);
    fn clear(&mut self);
}

/// Keeps the snapshot in memory. Useful for tests and single-process hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshot: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn load(&self) -> Option<Vec<u8>> {
        self.snapshot.clone()
    }

    fn save(&mut self, snapshot: Vec<u8>) {
        self.snapshot = Some(snapshot);
    }

    fn clear(&mut self) {
        self.snapshot = None;
    }
}

/// Select-then-move request cycle around a stored game.
///
/// Every call reloads the game from the store and saves it back after an
/// accepted move, so the store is the only place the game lives.
pub struct Session<S: GameStore> {
    store: S,
    selected: Option<Position>,
}

impl<S: GameStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            selected: None,
        }
    }

    /// Loads the stored game, starting a fresh one when the store is empty.
    pub fn state(&mut self) -> Result<GameState, SessionError> {
        match self.store.load() {
            Some(bytes) => Ok(snapshot::decode(&bytes)?),
            None => {
                info!("starting a new game");
                let state = GameState::new();
                self.store.save(snapshot::encode(&state));
                Ok(state)
            }
        }
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// Selects a piece of the player on turn and returns its destinations.
    pub fn select(&mut self, row: i32, col: i32) -> Result<Vec<Position>, SessionError> {
        let pos = Position::try_from_coords(row, col)?;
        let state = self.state()?;

        let owned = state
            .board()
            .get(pos)
            .is_some_and(|piece| piece.owner == state.current_player());
        if state.is_game_over() || !owned {
            return Err(SessionError::InvalidSelection);
        }

        self.selected = Some(pos);
        Ok(state.legal_destinations(pos))
    }

    /// Moves the selected piece to `(row, col)`.
    ///
    /// On a continuing capture the landing square becomes the selection;
    /// any other accepted move clears it. Rejected moves keep it.
    pub fn move_to(&mut self, row: i32, col: i32) -> Result<MoveOutcome, SessionError> {
        let to = Position::try_from_coords(row, col)?;
        let from = self.selected.ok_or(SessionError::NoSelection)?;
        let mut state = self.state()?;

        let outcome = state.apply_move(Move::new(from, to))?;
        self.store.save(snapshot::encode(&state));
        self.selected = outcome.continuation();
        if let Some(at) = self.selected {
            debug!("multiple capture available, {at} stays selected");
        }
        Ok(outcome)
    }

    /// Throws the stored game away and starts over.
    pub fn reset(&mut self) -> Result<GameState, SessionError> {
        self.store.clear();
        self.selected = None;
        self.state()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
