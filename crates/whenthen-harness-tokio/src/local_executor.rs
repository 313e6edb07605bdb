//! Executor that spawns operations as Tokio local tasks.

use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use whenthen::Executor;
use whenthen::curry::ApplyArgs;

/// Errors raised by [`LocalExecutor`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LocalExecutorError {
    /// Raised when no Tokio runtime is entered on the calling thread.
    #[error("no Tokio runtime is active on this thread: {source}")]
    NoRuntime {
        /// Error reported by Tokio.
        #[source]
        source: TryCurrentError,
    },
}

/// Executor that runs each operation on a later turn of the current
/// [`LocalSet`](tokio::task::LocalSet).
///
/// The operation is spawned with `tokio::task::spawn_local` and yields once
/// before it starts, so it never runs during `exec`. Operations are free to
/// spawn further local tasks or start timers before invoking their completion
/// callback.
///
/// # Panics
///
/// `exec` panics when a runtime is active but the calling thread is outside a
/// `LocalSet`. [`TokioHarness`](crate::TokioHarness) enters both for every
/// block it runs.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use whenthen::{Completer, when};
/// use whenthen_harness::{HarnessAdapter, HarnessConfig, Spec, SpecMetadata};
/// use whenthen_harness_tokio::{LocalExecutor, TokioHarness};
///
/// let spec = Spec::new(SpecMetadata::new("timer", "fires"), |scope| {
///     let op = |delay: u64, done: Completer<(u64,)>| {
///         tokio::task::spawn_local(async move {
///             tokio::time::sleep(Duration::from_millis(delay)).await;
///             done.complete((delay,));
///         });
///     };
///     if let Ok(chain) = when(scope, &LocalExecutor::new(), op, (5,)) {
///         chain.then(|delay: u64| assert_eq!(delay, 5));
///     }
/// });
/// TokioHarness::with_config(HarnessConfig::new()).run(spec)?;
/// # Ok::<(), whenthen_harness::SpecError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    /// Creates a local-set executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Executor for LocalExecutor {
    type Error = LocalExecutorError;

    fn exec<Op, Args>(&self, op: Op, args: Args) -> Result<(), LocalExecutorError>
    where
        Op: ApplyArgs<Args, Output = ()> + 'static,
        Args: 'static,
    {
        Handle::try_current().map_err(|source| LocalExecutorError::NoRuntime { source })?;
        tokio::task::spawn_local(async move {
            tokio::task::yield_now().await;
            op.apply_args(args);
        });
        log::trace!("operation spawned on the local set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LocalExecutor, LocalExecutorError};
    use std::cell::Cell;
    use std::rc::Rc;
    use whenthen::Executor;

    #[test]
    fn exec_without_runtime_is_rejected() {
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let outcome = LocalExecutor::new().exec(move || flag.set(true), ());
        assert!(matches!(outcome, Err(LocalExecutorError::NoRuntime { .. })));
        assert!(!ran.get());
    }

    #[test]
    fn exec_defers_the_operation_to_a_later_turn() {
        let Ok(runtime) = tokio::runtime::Builder::new_current_thread().build() else {
            panic!("current-thread runtime builds");
        };
        let local_set = tokio::task::LocalSet::new();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let probe = Rc::clone(&ran);
        local_set.block_on(&runtime, async move {
            let outcome = LocalExecutor::new().exec(move |value: u8| flag.set(value == 7), (7,));
            assert!(outcome.is_ok());
            assert!(!probe.get());
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
        });
        assert!(ran.get());
    }
}
