use crate::calendar::{default_epoch, DailySchedule, DEFAULT_ROLLOVER_HOUR};
use crate::error::{GameError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the puzzle for a session is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Puzzle of the day, persisted per effective date
    Daily,
    /// Uniformly random puzzle, kept in memory only
    Random,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Daily => write!(f, "daily"),
            SelectionMode::Random => write!(f, "random"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(SelectionMode::Daily),
            "random" | "practice" => Ok(SelectionMode::Random),
            other => Err(GameError::InvalidConfig {
                message: format!("unknown mode '{}'", other),
            }),
        }
    }
}

/// Configuration for a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Puzzle selection strategy
    pub mode: SelectionMode,
    /// Wrong guesses allowed before the session is lost
    pub max_mistakes: usize,
    /// Local hour at which the daily puzzle rolls over
    pub rollover_hour: u32,
    /// First day of the daily rotation
    pub epoch: NaiveDate,
    /// Prefix for persistence keys
    pub storage_prefix: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::daily()
    }
}

impl GameConfig {
    pub fn daily() -> Self {
        Self {
            mode: SelectionMode::Daily,
            max_mistakes: 4,
            rollover_hour: DEFAULT_ROLLOVER_HOUR,
            epoch: default_epoch(),
            storage_prefix: "connections".to_string(),
        }
    }

    pub fn random() -> Self {
        Self {
            mode: SelectionMode::Random,
            max_mistakes: 10,
            ..Self::daily()
        }
    }

    /// Preset for a mode
    pub fn for_mode(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Daily => Self::daily(),
            SelectionMode::Random => Self::random(),
        }
    }

    pub fn schedule(&self) -> DailySchedule {
        DailySchedule::new(self.epoch, self.rollover_hour)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_mistakes == 0 {
            return Err(GameError::InvalidConfig {
                message: "max_mistakes must be at least 1".to_string(),
            });
        }
        if self.rollover_hour > 23 {
            return Err(GameError::InvalidConfig {
                message: format!("rollover_hour {} is not an hour of the day", self.rollover_hour),
            });
        }
        if self.storage_prefix.is_empty() {
            return Err(GameError::InvalidConfig {
                message: "storage_prefix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
