//! Deterministic clock for tests and replays
//!
//! [`ManualClock`] returns a fixed instant that advances by a configurable
//! step on every reading. Successive ledger entries therefore get distinct,
//! strictly increasing timestamps without depending on wall-clock resolution.

use crate::core::traits::Clock;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cell::Cell;

/// Clock driven by the caller instead of the system
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
    step: Duration,
    today: Cell<Option<NaiveDate>>,
}

impl ManualClock {
    /// Clock that reads `start` first and then advances one second per reading
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    /// Clock that advances by `step` after every reading
    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        ManualClock {
            current: Cell::new(start),
            step,
            today: Cell::new(None),
        }
    }

    /// Move the clock forward without taking a reading
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    /// Pin the calendar date reported by `today`, independent of `now`
    pub fn set_today(&self, date: NaiveDate) {
        self.today.set(Some(date));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let reading = self.current.get();
        self.current.set(reading + self.step);
        reading
    }

    fn today(&self) -> NaiveDate {
        self.today
            .get()
            .unwrap_or_else(|| self.current.get().date_naive())
    }
}
