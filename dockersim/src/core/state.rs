//! In-memory counters and logs mutated by scenario runs.

use serde::Serialize;

use crate::core::log_store::LogStore;

/// Counter update that would leave the state unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("{counter} counter overflow")]
    CounterOverflow { counter: &'static str },
    /// Raised by a caller-built [`Step::mutate`](crate::step::Step::mutate)
    /// closure to abort its scenario with a custom message.
    #[error("{0}")]
    Rejected(String),
}

/// Resource counters reported on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub containers: u64,
    pub images: u64,
    pub networks: u64,
    pub tests_passed: u64,
}

impl Counters {
    /// Counters installed by a reset: the always-on base services.
    pub const BASELINE: Counters = Counters {
        containers: 3,
        images: 2,
        networks: 1,
        tests_passed: 0,
    };

    pub fn add_containers(&mut self, n: u64) -> Result<(), MutationError> {
        self.containers = checked(self.containers, n, "containers")?;
        Ok(())
    }

    pub fn add_images(&mut self, n: u64) -> Result<(), MutationError> {
        self.images = checked(self.images, n, "images")?;
        Ok(())
    }

    pub fn add_networks(&mut self, n: u64) -> Result<(), MutationError> {
        self.networks = checked(self.networks, n, "networks")?;
        Ok(())
    }

    pub fn record_pass(&mut self) -> Result<(), MutationError> {
        self.tests_passed = checked(self.tests_passed, 1, "testsPassed")?;
        Ok(())
    }
}

fn checked(current: u64, n: u64, counter: &'static str) -> Result<u64, MutationError> {
    current
        .checked_add(n)
        .ok_or(MutationError::CounterOverflow { counter })
}

/// Counters plus the log store, as reported by `/api/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemState {
    #[serde(flatten)]
    pub counters: Counters,
    pub logs: LogStore,
}

impl SystemState {
    /// Process-start state: zeroed counters and empty logs.
    pub fn new() -> Self {
        Self::default()
    }

    /// State installed by a reset.
    pub fn baseline() -> Self {
        Self {
            counters: Counters::BASELINE,
            logs: LogStore::new(),
        }
    }
}
