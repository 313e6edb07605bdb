//! The when/then bridge between callback-style operations and polled waits.
//!
//! [`when`] runs an operation through an [`Executor`], appending a
//! [`Completer`] as its trailing argument, and registers a wait on the host
//! that opens once the completer fires. [`Chain::then`] defers the assertions
//! behind that wait and calls them with the captured arguments spread as
//! positional parameters.

use std::fmt;

use whenthen_harness::{Block, HostFramework, WaitFor};

use crate::completion::{Completer, Completion};
use crate::curry::{ApplyArgs, Concat};
use crate::executor::Executor;

/// Assertion step produced by [`when`].
///
/// The chain borrows the host it registered its wait with, so its `then`
/// step lands in the same scope, right after that wait.
#[must_use = "a chain registers nothing until `then` is called"]
pub struct Chain<'h, H, Out> {
    host: &'h mut H,
    completion: Completion<Out>,
}

impl<H, Out> Chain<'_, H, Out> {
    /// Returns the completion the chain is waiting on.
    #[must_use]
    pub fn completion(&self) -> &Completion<Out> {
        &self.completion
    }

    /// Defers `assertions` until the operation has completed, then calls them
    /// with the completion arguments in order.
    ///
    /// # Panics
    ///
    /// The deferred block panics if the host runs it while the completion is
    /// still pending, which only happens when the host reorders waits and
    /// deferred blocks.
    pub fn then<'a, F>(self, assertions: F)
    where
        H: HostFramework<'a>,
        F: ApplyArgs<Out, Output = ()> + 'a,
        Out: 'a,
    {
        let completion = self.completion;
        self.host.defer(Block::new(move |_| {
            let Some(args) = completion.take_args() else {
                panic!("when/then assertions ran before the operation completed");
            };
            assertions.apply_args(args);
        }));
    }
}

impl<H, Out> fmt::Debug for Chain<'_, H, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

/// Runs `op` with `args` through `executor` and waits on the host for its
/// completion callback.
///
/// `op` receives the elements of `args` followed by a [`Completer`]; whatever
/// tuple it passes to [`Completer::complete`] becomes the argument list of the
/// assertions given to [`Chain::then`]. The wait uses the host's default
/// timeout.
///
/// # Errors
///
/// Returns the executor's error unchanged when it rejects the operation. No
/// wait is registered in that case.
///
/// # Examples
///
/// ```
/// use whenthen::{Completer, InlineExecutor, when};
/// use whenthen_harness::{HarnessAdapter, Spec, SpecMetadata, StdHarness};
///
/// fn lookup(key: &'static str, done: Completer<(&'static str, usize)>) {
///     done.complete((key, key.len()));
/// }
///
/// let spec = Spec::new(SpecMetadata::new("lookup", "reports length"), |scope| {
///     when(scope, &InlineExecutor, lookup, ("alpha",))
///         .unwrap_or_else(|never| match never {})
///         .then(|key: &'static str, len: usize| {
///             assert_eq!(key, "alpha");
///             assert_eq!(len, 5);
///         });
/// });
/// StdHarness::new().run(spec)?;
/// # Ok::<(), whenthen_harness::SpecError>(())
/// ```
pub fn when<'h, 'a, H, E, Op, Args, Out>(
    host: &'h mut H,
    executor: &E,
    op: Op,
    args: Args,
) -> Result<Chain<'h, H, Out>, E::Error>
where
    H: HostFramework<'a>,
    E: Executor,
    Args: Concat<(Completer<Out>,)>,
    Args::Output: 'static,
    Op: ApplyArgs<Args::Output, Output = ()> + 'static,
    Out: 'static,
{
    let completion = Completion::new();
    executor.exec(op, args.concat((completion.completer(),)))?;
    log::debug!("operation accepted; waiting for its completion callback");

    let latch = completion.clone();
    host.wait_for(WaitFor::new(move || latch.is_ready()));
    Ok(Chain { host, completion })
}
