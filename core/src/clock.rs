//! Simulation clock: owns the simulated-time offset.
//!
//! "Now" is the anchor instant plus the accumulated offset, where one month
//! is a fixed block of `DAYS_PER_MONTH` days. The offset only grows, and
//! never past the last instant chrono can represent.

use crate::types::DAYS_PER_MONTH;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    anchor:        DateTime<Utc>,
    offset_months: f64,
}

impl SimClock {
    /// Anchor the clock at the current wall time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Anchor the clock at a fixed instant. Used for reproducible runs.
    pub fn starting_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            offset_months: 0.0,
        }
    }

    /// Move simulated time forward. Fractional months are allowed.
    /// Negative or non-finite increments are ignored, as are increments
    /// that would leave the representable date range.
    pub fn advance(&mut self, months: f64) -> DateTime<Utc> {
        if !months.is_finite() || months < 0.0 {
            log::warn!("clock: ignoring invalid advance of {months} month(s)");
            return self.now();
        }
        let target = self.offset_months + months;
        if self.instant_at(target).is_none() {
            log::warn!(
                "clock: advance of {months} month(s) leaves the date range; holding at {}",
                self.now()
            );
            return self.now();
        }
        self.offset_months = target;
        self.now()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.instant_at(self.offset_months)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Anchor plus `offset_months`, or None past chrono's range.
    fn instant_at(&self, offset_months: f64) -> Option<DateTime<Utc>> {
        let seconds = (offset_months * DAYS_PER_MONTH as f64 * SECONDS_PER_DAY).round();
        if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
            return None;
        }
        Duration::try_seconds(seconds as i64).and_then(|d| self.anchor.checked_add_signed(d))
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn offset_months(&self) -> f64 {
        self.offset_months
    }

    /// Whole days between `since` and now. Negative when `since` is ahead.
    pub fn elapsed_days_since(&self, since: DateTime<Utc>) -> i64 {
        (self.now() - since).num_days()
    }
}

impl Default for SimClock {
    fn default() -> Self { Self::new() }
}
