//! Runtime configuration for harness adapters.
//!
//! The module exposes the default wait timeout and the polling cadence used
//! while a wait's latch stays closed. Both can be overridden through the
//! `WHENTHEN_DEFAULT_TIMEOUT_MS` and `WHENTHEN_POLL_INTERVAL_MS` environment
//! variables.

use std::time::Duration;

/// Timeout applied to waits that do not carry their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Pause between two latch checks of a pending wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

const TIMEOUT_VAR: &str = "WHENTHEN_DEFAULT_TIMEOUT_MS";
const POLL_INTERVAL_VAR: &str = "WHENTHEN_POLL_INTERVAL_MS";

/// Timing configuration shared by harness adapters.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use whenthen_harness::HarnessConfig;
///
/// let config = HarnessConfig::new().with_default_timeout(Duration::from_millis(250));
/// assert_eq!(config.default_timeout(), Duration::from_millis(250));
/// assert_eq!(config.poll_interval(), Duration::from_millis(10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    default_timeout: Duration,
    poll_interval: Duration,
}

impl HarnessConfig {
    /// Creates a configuration holding the built-in defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates a configuration from the built-in defaults overlaid with the
    /// process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates a configuration using `lookup` to resolve variable names.
    ///
    /// Values that are not a non-negative integer number of milliseconds are
    /// ignored with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(timeout) = read_millis(&lookup, TIMEOUT_VAR) {
            config.default_timeout = timeout;
        }
        if let Some(interval) = read_millis(&lookup, POLL_INTERVAL_VAR) {
            config.poll_interval = interval;
        }
        config
    }

    /// Replaces the default wait timeout.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Replaces the pause between latch checks.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the timeout applied to waits without their own.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Returns the pause between latch checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_millis(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
}

fn read_millis(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<Duration> {
    let raw = lookup(name)?;
    let parsed = parse_millis(&raw);
    if parsed.is_none() {
        log::warn!("ignoring {name}={raw:?}: expected a whole number of milliseconds");
    }
    parsed
}
