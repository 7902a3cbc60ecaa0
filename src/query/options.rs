//! Per-query and client-wide cache policy.

use std::time::Duration;

/// Staleness used when neither the query nor the client sets one: data is
/// stale as soon as it arrives.
pub const DEFAULT_STALE_TIME: Duration = Duration::ZERO;

/// How long an unobserved entry survives when nothing else is configured.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

/// Automatic retries after a failed fetch when nothing else is configured.
pub const DEFAULT_RETRY: u32 = 0;

/// Upper bound of the exponential retry backoff.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Cache policy knobs. `None` defers to the client defaults, then to the
/// built-in defaults above.
///
/// ```ignore
/// use green_plate::query::{CacheDuration, QueryOptions};
///
/// let options = QueryOptions::new()
///     .with_stale_time(CacheDuration::FiveMinutes)
///     .with_gc_time(CacheDuration::OneHour);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Option<Duration>,
    pub gc_time: Option<Duration>,
    pub retry: Option<u32>,
    /// Fixed delay between retries; exponential backoff when unset.
    pub retry_delay: Option<Duration>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_time(mut self, stale_time: impl Into<Duration>) -> Self {
        self.stale_time = Some(stale_time.into());
        self
    }

    pub fn with_gc_time(mut self, gc_time: impl Into<Duration>) -> Self {
        self.gc_time = Some(gc_time.into());
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_retry_delay(mut self, delay: impl Into<Duration>) -> Self {
        self.retry_delay = Some(delay.into());
        self
    }

    pub(crate) fn resolve(&self, defaults: &QueryOptions) -> ResolvedOptions {
        ResolvedOptions {
            stale_time: self
                .stale_time
                .or(defaults.stale_time)
                .unwrap_or(DEFAULT_STALE_TIME),
            gc_time: self.gc_time.or(defaults.gc_time).unwrap_or(DEFAULT_GC_TIME),
            retry: self.retry.or(defaults.retry).unwrap_or(DEFAULT_RETRY),
            retry_delay: self.retry_delay.or(defaults.retry_delay),
        }
    }
}

/// Options after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedOptions {
    pub stale_time: Duration,
    pub gc_time: Duration,
    pub retry: u32,
    pub retry_delay: Option<Duration>,
}

impl ResolvedOptions {
    /// Delay before retry number `attempt` (1-based).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if let Some(delay) = self.retry_delay {
            return delay;
        }
        let exponent = attempt.saturating_sub(1).min(5);
        Duration::from_secs(1u64 << exponent).min(MAX_RETRY_DELAY)
    }
}

/// Client-wide cache configuration.
///
/// The default leaves every per-query option unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryClientConfig {
    pub default_options: QueryOptions,
    /// Period of the background eviction sweep; lazy eviction only when unset.
    pub gc_sweep_interval: Option<Duration>,
}

impl QueryClientConfig {
    pub fn with_default_options(mut self, options: QueryOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn with_gc_sweep_interval(mut self, interval: Duration) -> Self {
        self.gc_sweep_interval = Some(interval);
        self
    }
}
