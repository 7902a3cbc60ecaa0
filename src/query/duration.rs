//! Named durations used to pick per-query staleness and gc policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const MINUTE_SECS: u64 = 60;
const HOUR_SECS: u64 = 60 * MINUTE_SECS;
const DAY_SECS: u64 = 24 * HOUR_SECS;

/// The fixed vocabulary of cache durations.
///
/// A month is 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheDuration {
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    HalfHour,
    OneHour,
    OneDay,
    OneWeek,
    OneMonth,
}

impl CacheDuration {
    /// Every named duration, shortest first.
    pub const ALL: [CacheDuration; 8] = [
        CacheDuration::FiveMinutes,
        CacheDuration::TenMinutes,
        CacheDuration::FifteenMinutes,
        CacheDuration::HalfHour,
        CacheDuration::OneHour,
        CacheDuration::OneDay,
        CacheDuration::OneWeek,
        CacheDuration::OneMonth,
    ];

    pub const fn as_duration(self) -> Duration {
        let secs = match self {
            CacheDuration::FiveMinutes => 5 * MINUTE_SECS,
            CacheDuration::TenMinutes => 10 * MINUTE_SECS,
            CacheDuration::FifteenMinutes => 15 * MINUTE_SECS,
            CacheDuration::HalfHour => 30 * MINUTE_SECS,
            CacheDuration::OneHour => HOUR_SECS,
            CacheDuration::OneDay => DAY_SECS,
            CacheDuration::OneWeek => 7 * DAY_SECS,
            CacheDuration::OneMonth => 30 * DAY_SECS,
        };
        Duration::from_secs(secs)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheDuration::FiveMinutes => "five-minutes",
            CacheDuration::TenMinutes => "ten-minutes",
            CacheDuration::FifteenMinutes => "fifteen-minutes",
            CacheDuration::HalfHour => "half-hour",
            CacheDuration::OneHour => "one-hour",
            CacheDuration::OneDay => "one-day",
            CacheDuration::OneWeek => "one-week",
            CacheDuration::OneMonth => "one-month",
        }
    }
}

impl From<CacheDuration> for Duration {
    fn from(value: CacheDuration) -> Self {
        value.as_duration()
    }
}

impl fmt::Display for CacheDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| format!("unknown cache duration '{}'", s))
    }
}
