//! Connections puzzle engine
//!
//! Find the four groups of three related items hidden among decoys. This
//! crate holds everything that is not presentation: the puzzle model and
//! catalog, the daily schedule, the session state machine, the persistence
//! contract and a [`Game`] driver that ties them together for both the daily
//! and the random variant.

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod puzzle;
pub mod results;
pub mod rng;
pub mod save;
pub mod session;

pub use calendar::{storage_key, DailySchedule};
pub use catalog::Catalog;
pub use config::{GameConfig, SelectionMode};
pub use error::{GameError, Result, StoreError};
pub use game::Game;
pub use puzzle::{Difficulty, Group, Puzzle, GROUP_COUNT, GROUP_SIZE};
pub use results::ResultsSummary;
pub use rng::SimpleRng;
pub use save::{MemoryStore, PersistenceStore, SavedState};
pub use session::{GuessResult, Outcome, PuzzleSession};
