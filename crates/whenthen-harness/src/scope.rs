//! Ordered step queues: deferred blocks and polled waits.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::adapter::HostFramework;

/// A deferred block owned by a scope.
///
/// The block receives a fresh child [`Scope`]; steps it registers there run
/// right after the block and before the block's later siblings.
///
/// # Examples
///
/// ```
/// use whenthen_harness::{Block, Scope};
///
/// let mut scope = Scope::new();
/// let block = Block::new(|child| child.runs(|_| {}));
/// block.run(&mut scope);
/// assert_eq!(scope.len(), 1);
/// ```
pub struct Block<'a> {
    inner: Box<dyn FnOnce(&mut Scope<'a>) + 'a>,
}

impl<'a> Block<'a> {
    /// Wraps a closure as a block.
    #[must_use]
    pub fn new(inner: impl FnOnce(&mut Scope<'a>) + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Executes the block, letting it register nested steps in `scope`.
    pub fn run(self, scope: &mut Scope<'a>) {
        (self.inner)(scope);
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block")
    }
}

/// A wait that holds back later steps until its latch opens.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use whenthen_harness::WaitFor;
///
/// let mut wait = WaitFor::new(|| true)
///     .with_message("the cache to warm up")
///     .with_timeout(Duration::from_millis(50));
/// assert!(wait.is_released());
/// assert_eq!(wait.message(), Some("the cache to warm up"));
/// ```
pub struct WaitFor<'a> {
    latch: Box<dyn FnMut() -> bool + 'a>,
    message: Option<String>,
    timeout: Option<Duration>,
}

impl<'a> WaitFor<'a> {
    /// Creates a wait from a latch predicate with no message or timeout.
    #[must_use]
    pub fn new(latch: impl FnMut() -> bool + 'a) -> Self {
        Self {
            latch: Box::new(latch),
            message: None,
            timeout: None,
        }
    }

    /// Describes the awaited condition for timeout reports.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets a timeout overriding the harness default.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the description of the awaited condition, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the wait's own timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Evaluates the latch once.
    pub fn is_released(&mut self) -> bool {
        (self.latch)()
    }
}

impl fmt::Debug for WaitFor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitFor")
            .field("message", &self.message)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub(crate) enum Step<'a> {
    Run(Block<'a>),
    Wait(WaitFor<'a>),
}

/// An ordered queue of blocks and waits.
///
/// Steps execute in registration order. A `Scope` is the
/// [`HostFramework`] handed to spec bodies and to every block.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    steps: VecDeque<Step<'a>>,
}

impl<'a> Scope<'a> {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
        }
    }

    /// Queues a block.
    pub fn runs(&mut self, block: impl FnOnce(&mut Self) + 'a) {
        self.defer(Block::new(block));
    }

    /// Queues a wait on `latch` using the harness default timeout.
    pub fn waits_for(&mut self, latch: impl FnMut() -> bool + 'a) {
        self.wait_for(WaitFor::new(latch));
    }

    /// Returns the number of queued steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` when no steps are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn into_steps(self) -> VecDeque<Step<'a>> {
        self.steps
    }
}

impl<'a> HostFramework<'a> for Scope<'a> {
    fn wait_for(&mut self, wait: WaitFor<'a>) {
        self.steps.push_back(Step::Wait(wait));
    }

    fn defer(&mut self, block: Block<'a>) {
        self.steps.push_back(Step::Run(block));
    }
}
