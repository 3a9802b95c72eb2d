use crate::store::data_dir;
use connections_core::Outcome;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
}

impl GameResult {
    pub fn from_outcome(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::Won => Some(GameResult::Win),
            Outcome::Lost => Some(GameResult::Loss),
            Outcome::InProgress => None,
        }
    }
}

/// Record of a single finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Storage key of a daily game, `None` for practice games
    pub key: Option<String>,
    pub puzzle_number: usize,
    pub result: GameResult,
    pub mistakes: usize,
    pub groups_found: usize,
    /// Unix timestamp when the game finished
    pub timestamp: i64,
}

/// Overall player statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub played: usize,
    pub wins: usize,
    pub losses: usize,
    pub current_streak: usize,
    pub best_streak: usize,
    /// Won games bucketed by mistakes made (index = mistakes)
    pub mistake_histogram: Vec<usize>,
}

impl PlayerStats {
    pub fn win_rate(&self) -> f32 {
        if self.played > 0 {
            self.wins as f32 / self.played as f32 * 100.0
        } else {
            0.0
        }
    }
}

/// The statistics manager
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsManager {
    pub player: PlayerStats,
    /// Finished games, most recent first
    pub history: Vec<GameRecord>,
    /// Where to save; `None` keeps stats in memory
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl StatsManager {
    /// Default stats file location
    pub fn default_path() -> PathBuf {
        data_dir().join("stats.json")
    }

    /// Load stats from a file, starting fresh if it is missing or unreadable
    pub fn load_from(path: PathBuf) -> Self {
        let mut stats: Self = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(error = %e, "stats file is corrupt, starting fresh");
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        stats.path = Some(path);
        stats
    }

    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Save stats to file
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!(error = %e, "failed to save stats");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize stats"),
        }
    }

    /// Whether a daily game has been counted already
    pub fn has_recorded(&self, key: &str) -> bool {
        self.history.iter().any(|r| r.key.as_deref() == Some(key))
    }

    /// Record a finished game.
    ///
    /// Daily games are counted once per storage key; returns false if the
    /// game was already recorded.
    pub fn record_game(
        &mut self,
        key: Option<&str>,
        puzzle_number: usize,
        result: GameResult,
        mistakes: usize,
        groups_found: usize,
    ) -> bool {
        if let Some(key) = key {
            if self.has_recorded(key) {
                return false;
            }
        }

        self.player.played += 1;
        match result {
            GameResult::Win => {
                self.player.wins += 1;
                self.player.current_streak += 1;
                self.player.best_streak = self.player.best_streak.max(self.player.current_streak);
                if self.player.mistake_histogram.len() <= mistakes {
                    self.player.mistake_histogram.resize(mistakes + 1, 0);
                }
                self.player.mistake_histogram[mistakes] += 1;
            }
            GameResult::Loss => {
                self.player.losses += 1;
                self.player.current_streak = 0;
            }
        }

        self.history.insert(
            0,
            GameRecord {
                key: key.map(str::to_string),
                puzzle_number,
                result,
                mistakes,
                groups_found,
                timestamp: chrono::Utc::now().timestamp(),
            },
        );

        // Limit history to last 1000 games
        if self.history.len() > 1000 {
            self.history.truncate(1000);
        }

        self.save();
        true
    }

    /// Get recent games
    pub fn recent_games(&self, limit: usize) -> &[GameRecord] {
        let end = limit.min(self.history.len());
        &self.history[..end]
    }
}

/// Format a duration in seconds as HH:MM:SS
pub fn format_countdown(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}
