//! Tokio current-thread harness adapter for spec execution.

use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use whenthen_harness::{HarnessAdapter, HarnessConfig, Pacer, Spec, SpecError, SpecReport};

/// Executes specs inside a Tokio current-thread runtime with a
/// [`LocalSet`](tokio::task::LocalSet).
///
/// `TokioHarness` builds a new single-threaded runtime and a `LocalSet` per
/// spec. Blocks run synchronously with both entered, so
/// `tokio::runtime::Handle::current()` and `tokio::task::spawn_local` are
/// available inside them. While a wait is pending the harness drives the
/// `LocalSet` for one poll interval, which lets spawned tasks (and the
/// operations a [`LocalExecutor`](crate::LocalExecutor) schedules) make
/// progress between latch checks.
///
/// After the last step the harness performs a single
/// `tokio::task::yield_now().await` tick. This is not a full drain of the
/// `LocalSet` queue; tasks still waiting on timers may be pending when `run`
/// returns.
///
/// # Examples
///
/// ```
/// use whenthen_harness::{HarnessAdapter, Spec, SpecMetadata};
/// use whenthen_harness_tokio::TokioHarness;
///
/// let spec = Spec::new(SpecMetadata::new("runtime", "is active"), |scope| {
///     scope.runs(|_| {
///         let _handle = tokio::runtime::Handle::current();
///     });
/// });
/// let report = TokioHarness::new().run(spec)?;
/// assert_eq!(report.blocks_run(), 2);
/// # Ok::<(), whenthen_harness::SpecError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioHarness {
    config: Option<HarnessConfig>,
}

impl TokioHarness {
    /// Creates a Tokio harness configured from the environment at run time.
    #[must_use]
    pub const fn new() -> Self {
        Self { config: None }
    }

    /// Creates a Tokio harness with an explicit configuration.
    #[must_use]
    pub const fn with_config(config: HarnessConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

/// Pacer driving a `LocalSet` for the length of each pause.
struct LocalSetPacer<'r> {
    runtime: &'r Runtime,
    local_set: &'r LocalSet,
}

impl Pacer for LocalSetPacer<'_> {
    fn pause(&mut self, interval: Duration) {
        self.local_set
            .block_on(self.runtime, tokio::time::sleep(interval));
    }
}

impl HarnessAdapter for TokioHarness {
    fn run(&self, spec: Spec<'_>) -> Result<SpecReport, SpecError> {
        let config = self.config.unwrap_or_else(HarnessConfig::from_env);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| SpecError::Environment {
                spec: spec.metadata().full_name(),
                source,
            })?;
        let local_set = LocalSet::new();
        let report = {
            let _runtime_guard = runtime.enter();
            let _local_guard = local_set.enter();
            let mut pacer = LocalSetPacer {
                runtime: &runtime,
                local_set: &local_set,
            };
            spec.execute(&config, &mut pacer)?
        };
        // One cooperative tick so tasks queued by the last block can start.
        // This is intentionally not a full `LocalSet` drain.
        local_set.block_on(&runtime, tokio::task::yield_now());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the Tokio current-thread harness.

    use super::TokioHarness;
    use rstest::{fixture, rstest};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;
    use whenthen_harness::{HarnessAdapter, HarnessConfig, Spec, SpecMetadata};

    #[fixture]
    fn harness() -> TokioHarness {
        TokioHarness::with_config(
            HarnessConfig::new()
                .with_default_timeout(Duration::from_millis(500))
                .with_poll_interval(Duration::from_millis(1)),
        )
    }

    #[rstest]
    fn tokio_harness_runs_spec(harness: TokioHarness) {
        let spec = Spec::new(
            SpecMetadata::new("simple", "runs in Tokio"),
            |scope| scope.runs(|_| assert_eq!(21 * 2, 42)),
        );
        assert!(harness.run(spec).is_ok_and(|report| report.blocks_run() == 2));
    }

    #[rstest]
    fn pauses_drive_spawned_tasks(harness: TokioHarness) {
        let done = Rc::new(Cell::new(false));
        let task_done = Rc::clone(&done);
        let latch_done = Rc::clone(&done);
        let spec = Spec::new(SpecMetadata::default(), move |scope| {
            tokio::task::spawn_local(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                task_done.set(true);
            });
            scope.waits_for(move || latch_done.get());
        });
        let report = harness.run(spec);
        assert!(report.is_ok_and(|report| report.polls() > 1));
        assert!(done.get());
    }
}
