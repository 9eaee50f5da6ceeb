use super::RunError;
use core::time::Duration;

/// How often snapshots are taken while the worker runs, unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Settings for a monitored run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    poll_interval: Duration,
}

impl RunOptions {
    /// Create options with the given poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidPollInterval`] for a zero interval.
    pub fn new(poll_interval: Duration) -> Result<Self, RunError> {
        if poll_interval.is_zero() {
            return Err(RunError::InvalidPollInterval(0.0));
        }

        Ok(Self { poll_interval })
    }

    /// Create options from a poll interval in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidPollInterval`] unless `seconds` is finite and positive.
    pub fn from_secs_f64(seconds: f64) -> Result<Self, RunError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(RunError::InvalidPollInterval(seconds));
        }

        Duration::try_from_secs_f64(seconds)
            .ok()
            .map_or(Err(RunError::InvalidPollInterval(seconds)), Self::new)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
