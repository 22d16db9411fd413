//! Issue age in whole days, weeks and 30-day months.
//!
//! Months are `floor(days / 30)`, not calendar months: month 12 begins on
//! day 360. Every threshold in the resolver and every countdown in the
//! composer is expressed in this arithmetic.

use crate::error::{OnboardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: i64 = 7;
pub const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInfo {
    pub days: i64,
    pub weeks: i64,
    pub months: i64,
}

impl TimeInfo {
    /// Age of something created at `created_at`, observed at `now`.
    ///
    /// Timestamps in the future (clock skew between us and the tracker)
    /// clamp to age zero.
    pub fn since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_days((now - created_at).num_days())
    }

    pub fn from_days(days: i64) -> Self {
        let days = days.max(0);
        Self {
            days,
            weeks: days / DAYS_PER_WEEK,
            months: days / DAYS_PER_MONTH,
        }
    }

    /// Parse an RFC 3339 creation timestamp and compute its age.
    pub fn from_timestamp(created_at: &str, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self::since(parse_timestamp(created_at)?, now))
    }

    /// Zero-based day within the current 30-day month.
    pub fn day_in_month(&self) -> i64 {
        self.days % DAYS_PER_MONTH
    }

    /// One-based 7-day window within the current month (1..=5; the fifth
    /// window only covers days 28 and 29).
    pub fn week_in_month(&self) -> u32 {
        (self.day_in_month() / DAYS_PER_WEEK) as u32 + 1
    }

    /// One-based day of the week counted from the creation weekday.
    pub fn day_in_week(&self) -> u32 {
        (self.days % DAYS_PER_WEEK) as u32 + 1
    }

    /// Days left until the first day of month `month`, never negative.
    pub fn days_until_month(&self, month: i64) -> i64 {
        (month * DAYS_PER_MONTH - self.days).max(0)
    }
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| OnboardError::InvalidTimestamp(s.to_string()))
}
