//! Host framework and harness adapter traits.

use std::time::Duration;

use crate::error::SpecError;
use crate::runner::{Spec, SpecReport};
use crate::scope::{Block, WaitFor};

/// Scheduling primitives a test body registers its steps with.
///
/// Waits suspend every step registered after them until their latch opens;
/// deferred blocks run once all earlier waits have resolved, in registration
/// order.
///
/// # Examples
///
/// ```
/// use whenthen_harness::{Block, HostFramework, Scope, WaitFor};
///
/// let mut scope = Scope::new();
/// scope.wait_for(WaitFor::new(|| true));
/// scope.defer(Block::new(|_| {}));
/// assert_eq!(scope.len(), 2);
/// ```
pub trait HostFramework<'a> {
    /// Registers a wait that holds back later steps.
    fn wait_for(&mut self, wait: WaitFor<'a>);

    /// Registers a block to run after all previously registered waits.
    fn defer(&mut self, block: Block<'a>);
}

/// Yields to the surrounding environment while a wait is pending.
pub trait Pacer {
    /// Gives pending work a chance to progress for roughly `interval`.
    fn pause(&mut self, interval: Duration);
}

/// Runs specs inside a harness-specific environment.
///
/// # Examples
///
/// ```
/// use whenthen_harness::{HarnessAdapter, Spec, SpecMetadata, StdHarness};
///
/// let spec = Spec::new(SpecMetadata::new("arithmetic", "adds"), |scope| {
///     scope.runs(|_| assert_eq!(5 + 5, 10));
/// });
/// let report = StdHarness::new().run(spec)?;
/// assert_eq!(report.blocks_run(), 2);
/// # Ok::<(), whenthen_harness::SpecError>(())
/// ```
pub trait HarnessAdapter {
    /// Executes one spec and reports what ran.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when a wait times out or the harness cannot
    /// prepare its environment. Panics raised by blocks propagate.
    fn run(&self, spec: Spec<'_>) -> Result<SpecReport, SpecError>;
}
