//! Game driver: one session core for both the daily and the random variant

use crate::calendar::storage_key;
use crate::catalog::Catalog;
use crate::config::{GameConfig, SelectionMode};
use crate::error::{GameError, Result, StoreError};
use crate::results::ResultsSummary;
use crate::rng::SimpleRng;
use crate::save::{load_state, save_state, PersistenceStore, SavedState};
use crate::session::{GuessResult, Outcome, PuzzleSession};
use chrono::{NaiveDate, NaiveDateTime};
use std::time::Duration;
use tracing::{info, warn};

/// A running game: selection strategy, session, tile order and persistence
pub struct Game<S: PersistenceStore> {
    config: GameConfig,
    catalog: Catalog,
    /// `None` once persistence has failed (or was never used)
    store: Option<S>,
    rng: SimpleRng,
    session: PuzzleSession,
    puzzle_index: usize,
    /// Effective date of the daily puzzle being played
    effective_date: Option<NaiveDate>,
    storage_key: Option<String>,
    /// Cosmetic display order of the active items
    tile_order: Vec<String>,
}

impl<S: PersistenceStore> Game<S> {
    /// Start a game, restoring today's progress in daily mode
    pub fn new(config: GameConfig, catalog: Catalog, store: S, now: NaiveDateTime) -> Result<Self> {
        Self::with_rng(config, catalog, store, now, SimpleRng::new())
    }

    /// Start a game with a specific RNG (reproducible tile order and draws)
    pub fn with_rng(
        config: GameConfig,
        catalog: Catalog,
        store: S,
        now: NaiveDateTime,
        rng: SimpleRng,
    ) -> Result<Self> {
        config.validate()?;

        let first = catalog.get(0).cloned().ok_or(GameError::CatalogEmpty)?;
        let mut game = Self {
            session: PuzzleSession::start(first, config.max_mistakes),
            config,
            catalog,
            store: Some(store),
            rng,
            puzzle_index: 0,
            effective_date: None,
            storage_key: None,
            tile_order: Vec::new(),
        };
        game.begin(now);
        Ok(game)
    }

    /// Select the puzzle for `now` and load or start its session
    fn begin(&mut self, now: NaiveDateTime) {
        match self.config.mode {
            SelectionMode::Daily => {
                let schedule = self.config.schedule();
                let date = schedule.effective_date(now);
                let (index, puzzle) = self.catalog.by_date(&schedule, date);
                let puzzle = puzzle.clone();
                let key = storage_key(&self.config.storage_prefix, date);

                let saved = self.load_saved(&key);
                self.session = match saved {
                    Some(state) => PuzzleSession::restore(puzzle, self.config.max_mistakes, &state),
                    None => PuzzleSession::start(puzzle, self.config.max_mistakes),
                };
                self.puzzle_index = index;
                self.effective_date = Some(date);
                self.storage_key = Some(key);
            }
            SelectionMode::Random => {
                let (index, puzzle) = self.catalog.random(&mut self.rng);
                self.session = PuzzleSession::start(puzzle.clone(), self.config.max_mistakes);
                self.puzzle_index = index;
                self.effective_date = None;
                self.storage_key = None;
            }
        }

        self.tile_order = self
            .session
            .active_items()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.rng.shuffle(&mut self.tile_order);

        info!(
            mode = %self.config.mode,
            puzzle = self.puzzle_index,
            solved = self.session.solved_count(),
            mistakes = self.session.mistakes(),
            "session started"
        );
    }

    /// Fetch saved progress; a failing store downgrades the game to in-memory
    fn load_saved(&mut self, key: &str) -> Option<SavedState> {
        let store = self.store.as_ref()?;
        match load_state(store, key) {
            Ok(state) => state,
            Err(StoreError::Corrupt(e)) => {
                warn!(key, error = %e, "ignoring corrupt saved state");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "persistence unavailable, continuing without saving");
                self.store = None;
                None
            }
        }
    }

    /// Write the current session; failures switch persistence off
    fn persist(&mut self) {
        if self.config.mode != SelectionMode::Daily {
            return;
        }
        let (Some(store), Some(key)) = (self.store.as_mut(), self.storage_key.as_deref()) else {
            return;
        };
        if let Err(e) = save_state(store, key, &self.session.snapshot()) {
            warn!(key, error = %e, "failed to save progress, continuing without saving");
            self.store = None;
        }
    }

    /// Select or deselect a tile; returns the selection size
    pub fn toggle_select(&mut self, item: &str) -> usize {
        self.session.toggle_select(item)
    }

    /// Drop the current selection
    pub fn deselect_all(&mut self) {
        self.session.clear_selection();
    }

    /// Evaluate the selection, then persist the new state
    pub fn submit_guess(&mut self) -> Option<GuessResult> {
        let result = self.session.submit_guess()?;

        if let GuessResult::Correct { group } = &result {
            self.tile_order.retain(|item| !group.contains(item));
        }
        self.persist();
        Some(result)
    }

    /// Re-order the remaining tiles; game state is untouched
    pub fn reshuffle(&mut self) {
        self.rng.shuffle(&mut self.tile_order);
    }

    /// Start over.
    ///
    /// Random mode always draws a fresh puzzle. Daily mode only moves on once
    /// the effective date has rolled over; returns whether a new session began.
    pub fn replay(&mut self, now: NaiveDateTime) -> bool {
        match self.config.mode {
            SelectionMode::Random => {
                self.begin(now);
                true
            }
            SelectionMode::Daily => {
                let date = self.config.schedule().effective_date(now);
                if self.effective_date == Some(date) {
                    return false;
                }
                self.begin(now);
                true
            }
        }
    }

    /// Active items in display order
    pub fn tiles(&self) -> &[String] {
        &self.tile_order
    }

    pub fn selected(&self) -> &[String] {
        self.session.selected()
    }

    pub fn session(&self) -> &PuzzleSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn outcome(&self) -> Outcome {
        self.session.outcome()
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_terminal()
    }

    pub fn results(&self) -> Option<ResultsSummary> {
        self.session.results()
    }

    /// 1-based number of the puzzle in the catalog
    pub fn puzzle_number(&self) -> usize {
        self.puzzle_index + 1
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }

    /// Whether progress is being written to the store
    pub fn is_persistent(&self) -> bool {
        self.config.mode == SelectionMode::Daily && self.store.is_some()
    }

    /// Countdown to the puzzle after the one being played (daily mode only).
    ///
    /// Zero once the effective date has moved past the current session.
    pub fn time_until_next_puzzle(&self, now: NaiveDateTime) -> Option<Duration> {
        let date = match self.config.mode {
            SelectionMode::Daily => self.effective_date?,
            SelectionMode::Random => return None,
        };
        let schedule = self.config.schedule();
        if schedule.effective_date(now) != date {
            return Some(Duration::ZERO);
        }
        Some(schedule.time_until_next(now))
    }

    /// Access the store, if persistence is still active
    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::sample_puzzle;
    use crate::save::MemoryStore;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![sample_puzzle()]).unwrap()
    }

    fn daily(store: MemoryStore, now: NaiveDateTime) -> Game<MemoryStore> {
        Game::with_rng(GameConfig::daily(), catalog(), store, now, SimpleRng::with_seed(5)).unwrap()
    }

    fn play(game: &mut Game<MemoryStore>, items: &[&str]) -> Option<GuessResult> {
        for item in items {
            game.toggle_select(item);
        }
        game.submit_guess()
    }

    /// Store whose reads and writes always fail
    struct BrokenStore;

    impl PersistenceStore for BrokenStore {
        fn load(&self, _key: &str) -> std::result::Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }

        fn save(&mut self, _key: &str, _blob: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    /// Store that reads fine but refuses writes
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl PersistenceStore for ReadOnlyStore {
        fn load(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
            self.0.load(key)
        }

        fn save(&mut self, _key: &str, _blob: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_daily_game_uses_date_key() {
        let game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        assert_eq!(game.storage_key(), Some("connections-2025-04-02"));
        assert_eq!(game.puzzle_number(), 1);
        assert!(game.is_persistent());
        assert_eq!(game.tiles().len(), 16);
    }

    #[test]
    fn test_daily_key_uses_effective_date() {
        let game = daily(MemoryStore::new(), at(2025, 4, 2, 9));
        assert_eq!(game.storage_key(), Some("connections-2025-04-01"));
    }

    #[test]
    fn test_progress_is_saved_after_every_guess() {
        let mut game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        play(&mut game, &["Jupiter", "Alpha", "Solitaire"]);
        let key = game.storage_key().unwrap().to_string();
        let saved = load_state(game.store().unwrap(), &key).unwrap().unwrap();
        assert_eq!(saved.mistakes, 1);
        assert!(!saved.completed);

        play(&mut game, &["Mars", "Venus", "Saturn"]);
        let saved = load_state(game.store().unwrap(), &key).unwrap().unwrap();
        assert_eq!(saved.solved_groups.len(), 1);
        assert_eq!(saved.solved_groups[0].category, "Planets");
    }

    #[test]
    fn test_selection_alone_is_not_saved() {
        let mut game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        game.toggle_select("Mars");
        assert!(game.store().unwrap().is_empty());
    }

    #[test]
    fn test_restart_restores_progress() {
        let now = at(2025, 4, 2, 12);
        let mut game = daily(MemoryStore::new(), now);
        play(&mut game, &["Delta", "Sigma", "Omega"]);
        play(&mut game, &["Jupiter", "Alpha", "Solitaire"]);
        let store = game.store().cloned().unwrap();

        let restored = daily(store, at(2025, 4, 2, 20));
        assert_eq!(restored.session().mistakes(), 1);
        assert_eq!(restored.session().solved_count(), 1);
        assert_eq!(restored.tiles().len(), 13);
        assert!(!restored.tiles().iter().any(|t| t == "Delta"));
    }

    #[test]
    fn test_finished_day_stays_finished() {
        let now = at(2025, 4, 2, 12);
        let mut game = daily(MemoryStore::new(), now);
        for _ in 0..4 {
            play(&mut game, &["Jupiter", "Alpha", "Solitaire"]);
        }
        assert_eq!(game.outcome(), Outcome::Lost);
        let store = game.store().cloned().unwrap();

        let mut again = daily(store, at(2025, 4, 3, 9));
        assert_eq!(again.outcome(), Outcome::Lost);
        assert!(again.results().is_some());
        assert!(!again.replay(at(2025, 4, 3, 9)));
        assert_eq!(again.outcome(), Outcome::Lost);
    }

    #[test]
    fn test_next_day_starts_fresh() {
        let mut game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        play(&mut game, &["Jupiter", "Alpha", "Solitaire"]);
        assert!(game.replay(at(2025, 4, 3, 10)));
        assert_eq!(game.session().mistakes(), 0);
        assert_eq!(game.storage_key(), Some("connections-2025-04-03"));
    }

    #[test]
    fn test_failing_store_falls_back_to_memory() {
        let mut game = Game::with_rng(
            GameConfig::daily(),
            catalog(),
            BrokenStore,
            at(2025, 4, 2, 12),
            SimpleRng::with_seed(1),
        )
        .unwrap();
        assert!(!game.is_persistent());
        for item in ["Mars", "Venus", "Saturn"] {
            game.toggle_select(item);
        }
        assert!(game.submit_guess().unwrap().is_correct());
        assert_eq!(game.session().solved_count(), 1);
    }

    #[test]
    fn test_failed_write_disables_persistence() {
        let mut game = Game::with_rng(
            GameConfig::daily(),
            catalog(),
            ReadOnlyStore::default(),
            at(2025, 4, 2, 12),
            SimpleRng::with_seed(1),
        )
        .unwrap();
        assert!(game.is_persistent());
        for item in ["Jupiter", "Alpha", "Solitaire"] {
            game.toggle_select(item);
        }
        game.submit_guess();
        assert!(!game.is_persistent());
        assert_eq!(game.session().mistakes(), 1);
    }

    #[test]
    fn test_corrupt_save_is_ignored() {
        let mut store = MemoryStore::new();
        store.save("connections-2025-04-02", "{broken").unwrap();
        let game = daily(store, at(2025, 4, 2, 12));
        assert_eq!(game.session().mistakes(), 0);
        assert!(game.is_persistent());
    }

    #[test]
    fn test_random_mode_never_persists() {
        let mut game = Game::with_rng(
            GameConfig::random(),
            catalog(),
            MemoryStore::new(),
            at(2025, 4, 2, 12),
            SimpleRng::with_seed(9),
        )
        .unwrap();
        assert!(!game.is_persistent());
        assert_eq!(game.session().max_mistakes(), 10);
        assert!(game.time_until_next_puzzle(at(2025, 4, 2, 12)).is_none());

        play(&mut game, &["Jupiter", "Alpha", "Solitaire"]);
        assert!(game.store().unwrap().is_empty());

        assert!(game.replay(at(2025, 4, 2, 12)));
        assert_eq!(game.session().mistakes(), 0);
    }

    #[test]
    fn test_reshuffle_keeps_items_and_selection() {
        let mut game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        game.toggle_select("Mars");
        let mut before = game.tiles().to_vec();
        game.reshuffle();
        let mut after = game.tiles().to_vec();
        assert_eq!(game.selected(), ["Mars"]);
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_correct_guess_removes_tiles() {
        let mut game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        play(&mut game, &["Bridge", "Poker", "Rummy"]);
        assert_eq!(game.tiles().len(), 13);
        assert!(!game.tiles().iter().any(|t| t == "Poker"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GameConfig::daily();
        config.max_mistakes = 0;
        let result = Game::new(config, catalog(), MemoryStore::new(), at(2025, 4, 2, 12));
        assert!(matches!(result, Err(GameError::InvalidConfig { .. })));
    }

    #[test]
    fn test_countdown_in_daily_mode() {
        let game = daily(MemoryStore::new(), at(2025, 4, 2, 12));
        assert_eq!(
            game.time_until_next_puzzle(at(2025, 4, 2, 12)),
            Some(Duration::from_secs(22 * 3600))
        );
        assert_eq!(
            game.time_until_next_puzzle(at(2025, 4, 3, 11)),
            Some(Duration::ZERO)
        );
    }
}
