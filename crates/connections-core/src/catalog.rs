use crate::calendar::DailySchedule;
use crate::error::{GameError, Result};
use crate::puzzle::Puzzle;
use crate::rng::SimpleRng;
use chrono::NaiveDate;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../data/puzzles.json");

/// A validated, non-empty list of puzzles
#[derive(Debug, Clone)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty list or any malformed puzzle
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self> {
        if puzzles.is_empty() {
            return Err(GameError::CatalogEmpty);
        }
        for (index, puzzle) in puzzles.iter().enumerate() {
            puzzle
                .validate()
                .map_err(|reason| GameError::InvalidPuzzle { index, reason })?;
        }
        Ok(Self { puzzles })
    }

    /// Parse a catalog from a JSON array of puzzles
    pub fn from_json(json: &str) -> Result<Self> {
        let puzzles: Vec<Puzzle> = serde_json::from_str(json)?;
        Self::new(puzzles)
    }

    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// Puzzle of the day for an effective date
    pub fn by_date(&self, schedule: &DailySchedule, date: NaiveDate) -> (usize, &Puzzle) {
        let index = schedule.index_for(date, self.puzzles.len());
        debug!(%date, index, "selected daily puzzle");
        (index, &self.puzzles[index])
    }

    /// Uniformly random puzzle
    pub fn random(&self, rng: &mut SimpleRng) -> (usize, &Puzzle) {
        let index = rng.next_usize(self.puzzles.len());
        debug!(index, "selected random puzzle");
        (index, &self.puzzles[index])
    }
}
