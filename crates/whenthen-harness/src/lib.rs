//! Host framework primitives for `whenthen`.
//!
//! This crate provides the scheduling surface test bodies register their steps
//! with: deferred blocks that run in order and polled waits that hold back
//! every later step until a latch opens. Harness adapters execute those steps
//! inside their own environment.

mod adapter;
mod config;
mod error;
mod runner;
mod scope;
mod std_harness;
#[cfg(test)]
mod test_utils;

pub use adapter::{HarnessAdapter, HostFramework, Pacer};
pub use config::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, HarnessConfig};
pub use error::{DEFAULT_WAIT_MESSAGE, SpecError};
pub use runner::{Spec, SpecMetadata, SpecReport};
pub use scope::{Block, Scope, WaitFor};
pub use std_harness::{SleepPacer, StdHarness};
