//! Default synchronous harness implementation.

use std::time::Duration;

use crate::adapter::{HarnessAdapter, Pacer};
use crate::config::HarnessConfig;
use crate::error::SpecError;
use crate::runner::{Spec, SpecReport};

/// Pacer that parks the current thread for the whole interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Framework-agnostic synchronous harness.
///
/// `StdHarness` executes specs on the calling thread. While a wait is pending
/// it hands control to its pacer; the default [`SleepPacer`] simply sleeps,
/// while event-loop pacers can drive queued work between latch checks.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use whenthen_harness::{HarnessAdapter, Spec, SpecMetadata, StdHarness};
///
/// let ready = Cell::new(false);
/// let spec = Spec::new(SpecMetadata::new("flag", "flips"), |scope| {
///     scope.runs(|_| ready.set(true));
///     scope.waits_for(|| ready.get());
/// });
/// let report = StdHarness::new().run(spec)?;
/// assert_eq!(report.waits_resolved(), 1);
/// # Ok::<(), whenthen_harness::SpecError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StdHarness<P = SleepPacer> {
    config: HarnessConfig,
    pacer: P,
}

impl StdHarness {
    /// Creates a sleeping harness configured from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::from_env())
    }

    /// Creates a sleeping harness with an explicit configuration.
    #[must_use]
    pub const fn with_config(config: HarnessConfig) -> Self {
        Self {
            config,
            pacer: SleepPacer,
        }
    }
}

impl Default for StdHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> StdHarness<P> {
    /// Replaces the pacer consulted while waits are pending.
    #[must_use]
    pub fn with_pacer<Q>(self, pacer: Q) -> StdHarness<Q> {
        StdHarness {
            config: self.config,
            pacer,
        }
    }

    /// Returns the harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }
}

impl<P: Pacer + Clone> HarnessAdapter for StdHarness<P> {
    fn run(&self, spec: Spec<'_>) -> Result<SpecReport, SpecError> {
        let mut pacer = self.pacer.clone();
        spec.execute(&self.config, &mut pacer)
    }
}
