//! Spec requests, metadata, and the step execution loop.

use std::collections::VecDeque;
use std::time::Instant;

use crate::adapter::{HostFramework, Pacer};
use crate::config::HarnessConfig;
use crate::error::{DEFAULT_WAIT_MESSAGE, SpecError};
use crate::scope::{Block, Scope, Step, WaitFor};

/// Spec metadata provided to harness adapters.
///
/// # Examples
///
/// ```
/// use whenthen_harness::SpecMetadata;
///
/// let metadata = SpecMetadata::new("session store", "expires idle sessions");
/// assert_eq!(metadata.suite(), "session store");
/// assert_eq!(metadata.full_name(), "session store expires idle sessions");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecMetadata {
    suite: String,
    description: String,
}

impl SpecMetadata {
    /// Creates metadata for one spec run.
    #[must_use]
    pub fn new(suite: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            description: description.into(),
        }
    }

    /// Returns the name of the enclosing suite.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Returns the spec description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the suite and description joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.suite, self.description)
    }
}

impl Default for SpecMetadata {
    fn default() -> Self {
        Self::new("<unknown>", "<unknown>")
    }
}

/// Counters describing one completed spec run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpecReport {
    blocks_run: usize,
    waits_resolved: usize,
    polls: usize,
}

impl SpecReport {
    /// Returns the number of blocks executed, the spec body included.
    #[must_use]
    pub const fn blocks_run(&self) -> usize {
        self.blocks_run
    }

    /// Returns the number of waits whose latch opened.
    #[must_use]
    pub const fn waits_resolved(&self) -> usize {
        self.waits_resolved
    }

    /// Returns the total number of latch evaluations.
    #[must_use]
    pub const fn polls(&self) -> usize {
        self.polls
    }
}

/// A harness execution request for one spec.
///
/// # Examples
///
/// ```
/// use whenthen_harness::{HarnessConfig, SleepPacer, Spec, SpecMetadata};
///
/// let spec = Spec::new(SpecMetadata::default(), |scope| {
///     scope.waits_for(|| true);
///     scope.runs(|_| {});
/// });
/// let report = spec.execute(&HarnessConfig::new(), &mut SleepPacer)?;
/// assert_eq!(report.waits_resolved(), 1);
/// # Ok::<(), whenthen_harness::SpecError>(())
/// ```
pub struct Spec<'a> {
    metadata: SpecMetadata,
    body: Block<'a>,
}

impl<'a> Spec<'a> {
    /// Creates a spec from metadata and its body.
    #[must_use]
    pub fn new(metadata: SpecMetadata, body: impl FnOnce(&mut Scope<'a>) + 'a) -> Self {
        Self {
            metadata,
            body: Block::new(body),
        }
    }

    /// Returns immutable metadata for diagnostics or harness setup.
    #[must_use]
    pub fn metadata(&self) -> &SpecMetadata {
        &self.metadata
    }

    /// Consumes the spec and returns metadata and body separately.
    #[must_use]
    pub fn into_parts(self) -> (SpecMetadata, Block<'a>) {
        (self.metadata, self.body)
    }

    /// Runs the body and every step it registers, pausing through `pacer`
    /// while waits are pending.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::WaitTimedOut`] when a latch stays closed past its
    /// timeout; the remaining steps are skipped.
    pub fn execute<P: Pacer + ?Sized>(
        self,
        config: &HarnessConfig,
        pacer: &mut P,
    ) -> Result<SpecReport, SpecError> {
        let spec_name = self.metadata.full_name();
        log::debug!("running spec '{spec_name}'");
        let mut root = Scope::new();
        root.defer(self.body);
        let mut execution = Execution {
            spec_name: &spec_name,
            config,
            pacer,
            report: SpecReport::default(),
        };
        execution.drain(root.into_steps())?;
        log::debug!("spec '{spec_name}' finished: {:?}", execution.report);
        Ok(execution.report)
    }
}

impl std::fmt::Debug for Spec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spec")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

struct Execution<'e, P: ?Sized> {
    spec_name: &'e str,
    config: &'e HarnessConfig,
    pacer: &'e mut P,
    report: SpecReport,
}

impl<P: Pacer + ?Sized> Execution<'_, P> {
    fn drain(&mut self, steps: VecDeque<Step<'_>>) -> Result<(), SpecError> {
        for step in steps {
            match step {
                Step::Run(block) => {
                    let mut nested = Scope::new();
                    block.run(&mut nested);
                    self.report.blocks_run += 1;
                    self.drain(nested.into_steps())?;
                }
                Step::Wait(wait) => self.await_latch(wait)?,
            }
        }
        Ok(())
    }

    fn await_latch(&mut self, mut wait: WaitFor<'_>) -> Result<(), SpecError> {
        let timeout = wait.timeout().unwrap_or(self.config.default_timeout());
        let started = Instant::now();
        loop {
            self.report.polls += 1;
            if wait.is_released() {
                self.report.waits_resolved += 1;
                return Ok(());
            }
            if started.elapsed() >= timeout {
                let message = wait.message().unwrap_or(DEFAULT_WAIT_MESSAGE).to_string();
                log::debug!("spec '{}' timed out waiting for {message}", self.spec_name);
                return Err(SpecError::WaitTimedOut {
                    spec: self.spec_name.to_string(),
                    message,
                    timeout,
                });
            }
            log::trace!("latch closed after {:?}; pausing", started.elapsed());
            self.pacer.pause(self.config.poll_interval());
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for spec metadata and the execution loop.

    use super::{Spec, SpecMetadata};
    use crate::adapter::Pacer;
    use crate::config::HarnessConfig;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    /// Counts pauses without sleeping.
    #[derive(Default)]
    struct CountingPacer {
        pauses: usize,
    }

    impl Pacer for CountingPacer {
        fn pause(&mut self, _interval: Duration) {
            self.pauses += 1;
        }
    }

    #[test]
    fn metadata_default_is_unknown() {
        let metadata = SpecMetadata::default();
        assert_eq!(metadata.suite(), "<unknown>");
        assert_eq!(metadata.description(), "<unknown>");
        assert_eq!(metadata.full_name(), "<unknown> <unknown>");
    }

    #[test]
    fn nested_steps_run_before_later_siblings() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let record = Rc::clone(&order);
        let spec = Spec::new(SpecMetadata::default(), move |scope| {
            let outer = Rc::clone(&record);
            scope.runs(move |nested| {
                outer.borrow_mut().push("first");
                let inner = Rc::clone(&outer);
                nested.runs(move |_| inner.borrow_mut().push("nested"));
            });
            scope.runs(move |_| record.borrow_mut().push("second"));
        });
        let report = spec.execute(&HarnessConfig::new(), &mut CountingPacer::default());
        assert!(report.is_ok());
        assert_eq!(*order.borrow(), vec!["first", "nested", "second"]);
    }

    #[test]
    fn pending_latch_pauses_until_released() {
        let checks = Rc::new(Cell::new(0u8));
        let latch_checks = Rc::clone(&checks);
        let spec = Spec::new(SpecMetadata::default(), move |scope| {
            scope.waits_for(move || {
                latch_checks.set(latch_checks.get() + 1);
                latch_checks.get() == 3
            });
        });
        let mut pacer = CountingPacer::default();
        let report = spec.execute(&HarnessConfig::new(), &mut pacer);
        let Ok(report) = report else {
            panic!("latch should open on the third check");
        };
        assert_eq!(report.polls(), 3);
        assert_eq!(report.waits_resolved(), 1);
        assert_eq!(pacer.pauses, 2);
    }

    #[test]
    fn zero_timeout_fails_after_first_closed_check() {
        let spec = Spec::new(SpecMetadata::new("queue", "never drains"), |scope| {
            scope.waits_for(|| false);
        });
        let config = HarnessConfig::new().with_default_timeout(Duration::ZERO);
        let mut pacer = CountingPacer::default();
        let Err(err) = spec.execute(&config, &mut pacer) else {
            panic!("closed latch with zero timeout must fail");
        };
        assert!(err.is_timeout());
        assert_eq!(err.spec(), "queue never drains");
        assert_eq!(pacer.pauses, 0);
    }
}
