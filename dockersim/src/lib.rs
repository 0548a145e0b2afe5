//! Simulated Docker orchestration scenarios for a browser demo.
//!
//! Nothing here talks to a container runtime. Each scenario is a fixed script
//! of delay, mutate, log steps run against one shared in-memory state:
//!
//! - **[`core`]**: Log buffers, counters, and wire types. No I/O, no waiting.
//! - **[`step`]**: The sequential step runner and its error type.
//! - **[`scenarios`]**: The six scripts and their summary reports.
//! - **[`harness`]**: The owned, shareable handle to the live state, with the
//!   injected pacing and random source.
//!
//! The HTTP surface lives in the `dockersim-server` crate.

pub mod core;
pub mod harness;
pub mod io;
pub mod logging;
pub mod pacing;
pub mod scenarios;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::state::{Counters, MutationError, SystemState};
pub use crate::core::types::{CategoryNotFound, LogCategory, LogEntry, LogType};
pub use crate::harness::{Harness, LogEvent};
pub use crate::scenarios::{Scenario, ScenarioReport};
pub use crate::step::ScenarioExecutionError;
