//! Error types surfaced by harness adapters.

use std::time::Duration;

use thiserror::Error;

/// Message used when a wait was registered without one.
pub const DEFAULT_WAIT_MESSAGE: &str = "something to happen";

/// Failures reported by a harness while executing a spec.
///
/// Panics raised inside blocks are not captured here; they unwind through
/// [`HarnessAdapter::run`](crate::HarnessAdapter::run) to the test itself.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpecError {
    /// Raised when a wait's latch stayed closed for its whole timeout.
    #[error("{spec}: timed out after {timeout:?} waiting for {message}")]
    WaitTimedOut {
        /// Full name of the spec that was running.
        spec: String,
        /// Description of the awaited condition.
        message: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// Raised when the harness could not prepare its execution environment.
    #[error("{spec}: failed to prepare the harness environment: {source}")]
    Environment {
        /// Full name of the spec that was about to run.
        spec: String,
        /// Root cause reported while preparing the environment.
        #[source]
        source: std::io::Error,
    },
}

impl SpecError {
    /// Returns the full name of the spec the error belongs to.
    #[must_use]
    pub fn spec(&self) -> &str {
        match self {
            Self::WaitTimedOut { spec, .. } | Self::Environment { spec, .. } => spec,
        }
    }

    /// Returns `true` when the error reports an elapsed wait timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimedOut { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_spec_and_condition() {
        let err = SpecError::WaitTimedOut {
            spec: "queue drains".to_string(),
            message: DEFAULT_WAIT_MESSAGE.to_string(),
            timeout: Duration::from_millis(40),
        };
        assert_eq!(
            err.to_string(),
            "queue drains: timed out after 40ms waiting for something to happen"
        );
        assert_eq!(err.spec(), "queue drains");
        assert!(err.is_timeout());
    }

    #[test]
    fn environment_error_keeps_source() {
        let err = SpecError::Environment {
            spec: "runtime".to_string(),
            source: std::io::Error::other("no reactor"),
        };
        assert!(!err.is_timeout());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            err.to_string(),
            "runtime: failed to prepare the harness environment: no reactor"
        );
    }
}
