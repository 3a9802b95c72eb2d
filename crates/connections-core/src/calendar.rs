//! Daily schedule: effective dates, puzzle-of-the-day index and rollover countdown

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::time::Duration;

/// Hour (local time) at which a new daily puzzle becomes available
pub const DEFAULT_ROLLOVER_HOUR: u32 = 10;

/// First day of the daily rotation
pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Maps wall-clock time onto the daily puzzle rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub epoch: NaiveDate,
    pub rollover_hour: u32,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            rollover_hour: DEFAULT_ROLLOVER_HOUR,
        }
    }
}

impl DailySchedule {
    pub fn new(epoch: NaiveDate, rollover_hour: u32) -> Self {
        Self {
            epoch,
            rollover_hour,
        }
    }

    /// The date whose puzzle is live at `now`.
    ///
    /// Before the rollover hour the previous day's puzzle is still live.
    pub fn effective_date(&self, now: NaiveDateTime) -> NaiveDate {
        let today = now.date();
        if now.hour() < self.rollover_hour {
            today.pred_opt().unwrap_or(today)
        } else {
            today
        }
    }

    /// Whole days from the epoch to `date` (negative before the epoch)
    pub fn day_offset(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.epoch).num_days()
    }

    /// Catalog index for `date`; `puzzle_count` must be non-zero
    pub fn index_for(&self, date: NaiveDate, puzzle_count: usize) -> usize {
        self.day_offset(date).rem_euclid(puzzle_count as i64) as usize
    }

    /// Instant at which the puzzle after the one live at `now` unlocks
    pub fn next_rollover(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let next_day = self.effective_date(now).succ_opt()?;
        let at = NaiveTime::from_hms_opt(self.rollover_hour, 0, 0)?;
        Some(next_day.and_time(at))
    }

    /// Time left until the next puzzle, zero if it is already due
    pub fn time_until_next(&self, now: NaiveDateTime) -> Duration {
        self.next_rollover(now)
            .and_then(|next| (next - now).to_std().ok())
            .unwrap_or_default()
    }
}

/// Persistence key for the session of a given effective date
pub fn storage_key(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, date.format("%Y-%m-%d"))
}
