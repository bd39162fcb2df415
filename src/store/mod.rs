// src/store/mod.rs

//! Where live games are kept.
//!
//! The engine never looks games up itself. Callers receive a [`GameStore`]
//! and go through a [`GameHandle`], which serializes every operation on one
//! game behind that game's own mutex. Different games never share a lock.

use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::role::Role;
use crate::simulation::config::GameSettings;
use crate::simulation::engine::{Game, GameId, SubmitOutcome};
use crate::simulation::error::{LifecycleError, SubmitError};
use crate::simulation::view::{GameView, Viewer};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared, lockable reference to one game.
#[derive(Debug, Clone)]
pub struct GameHandle {
    inner: Arc<Mutex<Game>>,
}

impl GameHandle {
    pub fn new(game: Game) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    /// Round advancement has no panicking path, so a poisoned lock still
    /// guards a consistent game.
    fn lock(&self) -> MutexGuard<'_, Game> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the game.
    pub fn with_game<T>(&self, f: impl FnOnce(&mut Game) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn submit(&self, role: Role, quantity: i64) -> Result<SubmitOutcome, SubmitError> {
        let mut game = self.lock();
        let result = game.submit(role, quantity);
        if let Err(err) = &result {
            warn!(game = %game.id(), %role, quantity, error = %err, "order rejected");
        }
        result
    }

    pub fn submit_for_round(
        &self,
        round: u32,
        role: Role,
        quantity: i64,
    ) -> Result<SubmitOutcome, SubmitError> {
        let mut game = self.lock();
        let result = game.submit_for_round(round, role, quantity);
        if let Err(err) = &result {
            warn!(game = %game.id(), round, %role, quantity, error = %err, "order rejected");
        }
        result
    }

    pub fn start(&self) -> Result<(), LifecycleError> {
        self.lock().start()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn update_settings(&self, settings: GameSettings) -> Result<(), LifecycleError> {
        self.lock().update_settings(settings)
    }

    /// Projects a consistent view: a round is either fully visible or not
    /// at all.
    pub fn view(&self, viewer: Viewer) -> GameView {
        GameView::project(&self.lock(), viewer)
    }

    /// A detached copy of the whole game.
    pub fn snapshot(&self) -> Game {
        self.lock().clone()
    }
}

/// Repository of live games, injected into whatever serves requests.
pub trait GameStore: Send + Sync {
    /// Creates and stores a new game, returning its id.
    fn create(&self, settings: GameSettings) -> GameId;

    fn get(&self, id: GameId) -> Option<GameHandle>;

    /// Removes a game; returns whether it existed.
    fn remove(&self, id: GameId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: GameId) -> StoreResult<GameHandle> {
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    fn submit(&self, id: GameId, role: Role, quantity: i64) -> StoreResult<SubmitOutcome> {
        Ok(self.handle(id)?.submit(role, quantity)?)
    }

    fn start(&self, id: GameId) -> StoreResult<()> {
        Ok(self.handle(id)?.start()?)
    }

    /// Replaces the game's simulation state, keeping its id and settings.
    fn reset(&self, id: GameId) -> StoreResult<()> {
        self.handle(id)?.reset();
        Ok(())
    }

    fn view(&self, id: GameId, viewer: Viewer) -> StoreResult<GameView> {
        Ok(self.handle(id)?.view(viewer))
    }
}

/// Process-local store with no durability.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: DashMap<GameId, GameHandle>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for InMemoryGameStore {
    fn create(&self, settings: GameSettings) -> GameId {
        let game = Game::with_settings(settings);
        let id = game.id();
        self.games.insert(id, GameHandle::new(game));
        info!(game = %id, "game created");
        id
    }

    fn get(&self, id: GameId) -> Option<GameHandle> {
        self.games.get(&id).map(|entry| entry.value().clone())
    }

    fn remove(&self, id: GameId) -> bool {
        self.games.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.games.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use uuid::Uuid;

    #[test]
    fn test_create_and_lookup() {
        let store = InMemoryGameStore::new();
        let id = store.create(GameSettings::default());
        assert_eq!(store.len(), 1);
        assert_eq!(store.handle(id).unwrap().snapshot().id(), id);

        let missing = Uuid::new_v4();
        assert_eq!(
            store.submit(missing, Role::Retailer, 5),
            Err(StoreError::NotFound(missing))
        );
        assert!(store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_errors_pass_through() {
        let store = InMemoryGameStore::new();
        let id = store.create(GameSettings::default());
        assert_eq!(
            store.submit(id, Role::Retailer, 5),
            Err(StoreError::Submit(SubmitError::NotStarted))
        );
        store.start(id).unwrap();
        assert_eq!(
            store.start(id),
            Err(StoreError::Lifecycle(LifecycleError::AlreadyStarted))
        );
    }

    #[test]
    fn test_concurrent_submissions_advance_once() {
        let store = Arc::new(InMemoryGameStore::new());
        let id = store.create(GameSettings::default());
        store.start(id).unwrap();

        let workers: Vec<_> = Role::ALL
            .into_iter()
            .map(|role| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.submit(id, role, 5).unwrap())
            })
            .collect();
        let advanced = workers
            .into_iter()
            .map(|w| w.join().unwrap())
            .filter(|outcome| outcome.advanced().is_some())
            .count();

        assert_eq!(advanced, 1);
        let game = store.handle(id).unwrap().snapshot();
        assert_eq!(game.round_index(), 1);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_reset_keeps_id_in_store() {
        let store = InMemoryGameStore::new();
        let id = store.create(GameSettings::default());
        store.start(id).unwrap();
        store.submit(id, Role::Factory, 12).unwrap();
        store.reset(id).unwrap();

        let view = store.view(id, Viewer::Admin).unwrap();
        assert_eq!(view.game_id, id);
        assert!(!view.started);
        assert_eq!(view.submissions_count, 0);
    }
}
