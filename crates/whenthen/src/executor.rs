//! Executors that run operations on behalf of the when/then bridge.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use whenthen_harness::Pacer;

use crate::curry::ApplyArgs;

/// Runs an operation with its arguments spread as positional parameters.
///
/// The trailing argument handed to the operation is its completion callback.
/// An executor may call the operation immediately or on a later turn of its
/// own loop; either way the operation is responsible for invoking the
/// callback.
pub trait Executor {
    /// Failure raised synchronously while accepting an operation.
    type Error: std::error::Error + 'static;

    /// Accepts `op` for execution with `args`.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when the operation cannot be accepted; the
    /// operation is then never run.
    fn exec<Op, Args>(&self, op: Op, args: Args) -> Result<(), Self::Error>
    where
        Op: ApplyArgs<Args, Output = ()> + 'static,
        Args: 'static;
}

/// Executor that runs each operation immediately on the calling thread.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use whenthen::{Executor, InlineExecutor};
///
/// let total = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&total);
/// InlineExecutor.exec(move |a: i32, b: i32| sink.set(a + b), (2, 3))?;
/// assert_eq!(total.get(), 5);
/// # Ok::<(), std::convert::Infallible>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    type Error = Infallible;

    fn exec<Op, Args>(&self, op: Op, args: Args) -> Result<(), Infallible>
    where
        Op: ApplyArgs<Args, Output = ()> + 'static,
        Args: 'static,
    {
        op.apply_args(args);
        Ok(())
    }
}

/// Errors raised by [`TurnExecutor`].
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TurnExecutorError {
    /// Raised when an operation is submitted after [`TurnExecutor::close`].
    #[error("turn executor is closed")]
    Closed,
}

type Turn = Box<dyn FnOnce()>;

/// Single-threaded executor that defers each operation to a later turn.
///
/// Operations queue up in submission order. Every [`Pacer::pause`] runs the
/// oldest one, so a harness using this executor as its pacer completes
/// operations between latch checks. When nothing is queued the pause sleeps
/// for the requested interval instead.
///
/// Clones share the same queue.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use whenthen::{Executor, TurnExecutor};
///
/// let executor = TurnExecutor::new();
/// let hits = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&hits);
/// executor.exec(move || sink.set(sink.get() + 1), ())?;
/// assert_eq!((executor.pending(), hits.get()), (1, 0));
///
/// assert_eq!(executor.run_until_idle(), 1);
/// assert_eq!(hits.get(), 1);
/// # Ok::<(), whenthen::TurnExecutorError>(())
/// ```
#[derive(Clone, Default)]
pub struct TurnExecutor {
    queue: Rc<RefCell<VecDeque<Turn>>>,
    closed: Rc<Cell<bool>>,
}

impl TurnExecutor {
    /// Creates an open executor with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of queued operations.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Rejects every operation submitted from now on.
    ///
    /// Operations already queued still run.
    pub fn close(&self) {
        self.closed.set(true);
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Runs the oldest queued operation, returning `false` if none was queued.
    pub fn run_next(&self) -> bool {
        // Release the borrow before running: operations may queue more work.
        let next = self.queue.borrow_mut().pop_front();
        next.is_some_and(|turn| {
            turn();
            true
        })
    }

    /// Runs queued operations, including ones they queue, until none remain.
    ///
    /// Returns the number of operations run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Executor for TurnExecutor {
    type Error = TurnExecutorError;

    fn exec<Op, Args>(&self, op: Op, args: Args) -> Result<(), TurnExecutorError>
    where
        Op: ApplyArgs<Args, Output = ()> + 'static,
        Args: 'static,
    {
        if self.closed.get() {
            return Err(TurnExecutorError::Closed);
        }
        self.queue
            .borrow_mut()
            .push_back(Box::new(move || op.apply_args(args)));
        Ok(())
    }
}

impl Pacer for TurnExecutor {
    fn pause(&mut self, interval: Duration) {
        if !self.run_next() {
            std::thread::sleep(interval);
        }
    }
}

impl fmt::Debug for TurnExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnExecutor")
            .field("pending", &self.pending())
            .field("closed", &self.closed.get())
            .finish()
    }
}
