//! Fluent when/then assertions over callback-style asynchronous operations.
//!
//! [`when`] hands an operation to an [`Executor`] together with a completion
//! callback, then registers a wait with the host framework that opens once the
//! callback fires. The returned [`Chain`] defers assertions behind that wait
//! and calls them with the callback's arguments:
//!
//! ```
//! use whenthen::{Completer, TurnExecutor, when};
//! use whenthen::harness::{HarnessAdapter, HarnessConfig, Spec, SpecMetadata, StdHarness};
//!
//! fn fetch(id: u32, done: Completer<(String, u32)>) {
//!     done.complete((format!("user-{id}"), 200));
//! }
//!
//! let executor = TurnExecutor::new();
//! let spec = Spec::new(SpecMetadata::new("users", "fetch by id"), |scope| {
//!     if let Ok(chain) = when(scope, &executor, fetch, (7,)) {
//!         chain.then(|name: String, status: u32| {
//!             assert_eq!(name, "user-7");
//!             assert_eq!(status, 200);
//!         });
//!     }
//! });
//! let harness = StdHarness::with_config(HarnessConfig::new()).with_pacer(executor.clone());
//! let report = harness.run(spec)?;
//! assert_eq!(report.waits_resolved(), 1);
//! # Ok::<(), whenthen::harness::SpecError>(())
//! ```
//!
//! The [`curry`] module holds the argument-list plumbing the bridge relies on:
//! spreading tuples into positional parameters and fixing leading arguments.

mod bridge;
mod completion;
pub mod curry;
mod executor;

pub use bridge::{Chain, when};
pub use completion::{Completer, Completion};
pub use curry::{Curried, apply_args, apply_args_on};
pub use executor::{Executor, InlineExecutor, TurnExecutor, TurnExecutorError};

/// Host framework primitives re-exported from `whenthen-harness`.
pub use whenthen_harness as harness;
