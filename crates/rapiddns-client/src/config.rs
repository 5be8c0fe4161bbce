//! Client configuration types.

use std::time::Duration;

/// Default delay between status reads while an export is running
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default delay before retrying a status read that failed
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Export polling configuration.
///
/// Polling has no deadline by default: a running export is polled until it
/// completes or fails, and failed status reads are retried indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between successful status reads
    pub interval: Duration,

    /// Delay after a status read failed
    pub retry_backoff: Duration,

    /// Give up after this much time spent polling
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PollConfig {
    /// Create a new poll configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            deadline: None,
        }
    }

    /// Set the delay between successful status reads
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the delay after a failed status read
    #[must_use]
    pub const fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Bound the total polling time (`None` polls forever)
    #[must_use]
    pub const fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// How long to sleep next, or `None` once the deadline has passed
    #[must_use]
    pub fn next_delay(&self, wanted: Duration, elapsed: Duration) -> Option<Duration> {
        match self.deadline {
            None => Some(wanted),
            Some(deadline) if elapsed >= deadline => None,
            Some(deadline) => Some(wanted.min(deadline - elapsed)),
        }
    }
}
