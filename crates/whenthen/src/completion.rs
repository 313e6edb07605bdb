//! Completion state shared between an operation's callback and its chain.
//!
//! A [`Completion`] moves through three phases: pending until the first call to
//! [`Completer::complete`], resolved while it holds the captured arguments, and
//! delivered once [`Completion::take_args`] has handed them out. Readiness is a
//! pure function of the phase.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

enum Phase<Args> {
    Pending,
    Resolved(Args),
    Delivered,
}

struct Shared<Args> {
    phase: RefCell<Phase<Args>>,
    calls: Cell<usize>,
}

/// Readiness flag and captured arguments of one asynchronous operation.
///
/// # Examples
///
/// ```
/// use whenthen::Completion;
///
/// let completion = Completion::new();
/// let done = completion.completer();
/// assert!(!completion.is_ready());
///
/// done.complete(("row", 3));
/// assert!(completion.is_ready());
/// assert_eq!(completion.take_args(), Some(("row", 3)));
/// ```
pub struct Completion<Args> {
    shared: Rc<Shared<Args>>,
}

impl<Args> Completion<Args> {
    /// Creates a pending completion.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                phase: RefCell::new(Phase::Pending),
                calls: Cell::new(0),
            }),
        }
    }

    /// Returns a callback that resolves this completion.
    #[must_use]
    pub fn completer(&self) -> Completer<Args> {
        Completer {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Returns `true` once the completer has been invoked.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !matches!(*self.shared.phase.borrow(), Phase::Pending)
    }

    /// Returns how many times the completer has been invoked.
    #[must_use]
    pub fn completion_count(&self) -> usize {
        self.shared.calls.get()
    }

    /// Hands out the captured arguments.
    ///
    /// Returns `None` while pending and on every call after the first
    /// successful one.
    #[must_use]
    pub fn take_args(&self) -> Option<Args> {
        let mut phase = self.shared.phase.borrow_mut();
        match std::mem::replace(&mut *phase, Phase::Delivered) {
            Phase::Resolved(args) => Some(args),
            Phase::Pending => {
                *phase = Phase::Pending;
                None
            }
            Phase::Delivered => None,
        }
    }
}

impl<Args> Clone for Completion<Args> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<Args> Default for Completion<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for Completion<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("ready", &self.is_ready())
            .field("calls", &self.completion_count())
            .finish()
    }
}

/// Completion callback handed to an operation as its trailing argument.
///
/// Only the first call is recorded. Later calls leave the captured arguments
/// untouched; they are counted and logged.
pub struct Completer<Args> {
    shared: Rc<Shared<Args>>,
}

impl<Args> Completer<Args> {
    /// Records `args` as the operation's result.
    pub fn complete(&self, args: Args) {
        let calls = self.shared.calls.get() + 1;
        self.shared.calls.set(calls);
        let mut phase = self.shared.phase.borrow_mut();
        if matches!(*phase, Phase::Pending) {
            *phase = Phase::Resolved(args);
            log::debug!("completion resolved");
        } else {
            log::warn!("completion callback invoked {calls} times; ignoring the later arguments");
        }
    }
}

impl<Args> Clone for Completer<Args> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<Args> fmt::Debug for Completer<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("calls", &self.shared.calls.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Completion;

    #[test]
    fn pending_completion_has_no_args() {
        let completion: Completion<(u8,)> = Completion::new();
        assert!(!completion.is_ready());
        assert_eq!(completion.take_args(), None);
        assert!(!completion.is_ready());
        assert_eq!(completion.completion_count(), 0);
    }

    #[test]
    fn first_completion_wins() {
        let completion = Completion::new();
        let done = completion.completer();
        done.complete(("first",));
        done.clone().complete(("second",));
        assert_eq!(completion.completion_count(), 2);
        assert_eq!(completion.take_args(), Some(("first",)));
    }

    #[test]
    fn args_are_delivered_once_and_readiness_stays() {
        let completion = Completion::new();
        completion.completer().complete(());
        assert_eq!(completion.take_args(), Some(()));
        assert_eq!(completion.take_args(), None);
        assert!(completion.is_ready());
    }

    #[test]
    fn completion_after_delivery_is_ignored() {
        let completion = Completion::new();
        let done = completion.completer();
        done.complete((1, 2));
        assert_eq!(completion.take_args(), Some((1, 2)));
        done.complete((3, 4));
        assert_eq!(completion.take_args(), None);
        assert_eq!(completion.completion_count(), 2);
    }
}
