//! Tokio harness adapter and local-set executor for `whenthen`.
//!
//! [`TokioHarness`] runs specs inside a current-thread Tokio runtime and
//! drives its `LocalSet` while waits are pending. [`LocalExecutor`] hands
//! operations to that `LocalSet`, so callbacks may fire from timers or other
//! local tasks.

mod local_executor;
mod tokio_harness;

pub use local_executor::{LocalExecutor, LocalExecutorError};
pub use tokio_harness::TokioHarness;
