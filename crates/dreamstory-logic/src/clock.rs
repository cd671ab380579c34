//! Simulated wall clock.
//!
//! The clock advances by a fixed number of minutes per tick and reports when
//! the calendar date changes. It never schedules itself; the caller decides
//! how often to tick.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Simulated minutes per tick.
pub const DEFAULT_TICK_MINUTES: u32 = 15;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Longest tick allowed, so a single tick crosses at most one midnight.
pub const MAX_TICK_MINUTES: u32 = MINUTES_PER_DAY;

/// Session start: 2024-01-01 07:00.
pub fn default_start_time() -> NaiveDateTime {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let time = NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default();
    NaiveDateTime::new(date, time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    now: NaiveDateTime,
}

impl GameClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Advance by `minutes`. Returns `true` if the date changed.
    ///
    /// At the far end of chrono's range the clock stops instead of
    /// overflowing.
    pub fn advance(&mut self, minutes: u32) -> bool {
        let Some(next) = self
            .now
            .checked_add_signed(Duration::minutes(i64::from(minutes)))
        else {
            log::warn!("Game clock saturated at {}", self.now);
            return false;
        };
        let crossed = next.date() != self.now.date();
        self.now = next;
        crossed
    }

    /// `HH:MM`, 24-hour.
    pub fn format(&self) -> String {
        self.now.format("%H:%M").to_string()
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(default_start_time())
    }
}

/// Ticks needed from `from` to reach the next midnight.
pub fn ticks_until_midnight(from: NaiveDateTime, tick_minutes: u32) -> u32 {
    if tick_minutes == 0 {
        return 0;
    }
    let minutes_into_day = from.hour() * 60 + from.minute();
    let remaining = MINUTES_PER_DAY - minutes_into_day;
    remaining.div_ceil(tick_minutes)
}
