//! The single live system state plus the collaborators scenario runs need.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::core::state::{Counters, MutationError, SystemState};
use crate::core::types::{CategoryNotFound, LogCategory, LogEntry, LogType};
use crate::io::config::HarnessConfig;
use crate::pacing::{Pacer, TokioPacer};
use crate::scenarios::{Plan, Scenario, ScenarioReport};
use crate::step::{Mutation, ScenarioExecutionError, run_script};

/// A log entry as it was appended, broadcast to live subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub category: LogCategory,
    pub entry: LogEntry,
}

/// Cheaply clonable handle to the shared system state.
#[derive(Clone)]
pub struct Harness {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SystemState>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    pacer: Arc<dyn Pacer>,
    /// Present when scenario runs are serialized.
    run_gate: Option<tokio::sync::Mutex<()>>,
    events: broadcast::Sender<LogEvent>,
}

impl Harness {
    /// Build a harness from explicit collaborators.
    ///
    /// With `serialize_runs` unset, concurrent scenario runs share the state
    /// with no isolation and may interleave at every delay.
    pub fn new(pacer: Arc<dyn Pacer>, rng: Box<dyn RngCore + Send>, serialize_runs: bool) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SystemState::new()),
                rng: Mutex::new(rng),
                pacer,
                run_gate: serialize_runs.then(|| tokio::sync::Mutex::new(())),
                events,
            }),
        }
    }

    /// Real-time pacing and an entropy-seeded random source.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            Arc::new(TokioPacer::new(config.delay_scale)),
            Box::new(StdRng::from_entropy()),
            config.serialize_runs,
        )
    }

    /// Snapshot of counters and logs.
    pub fn current(&self) -> SystemState {
        self.state().clone()
    }

    pub fn counters(&self) -> Counters {
        self.state().counters
    }

    /// Retained entries for a category given by wire name.
    pub fn logs(&self, category: &str) -> Result<Vec<LogEntry>, CategoryNotFound> {
        self.state().logs.entries(category)
    }

    /// Replace the whole state with the baseline in one lock acquisition.
    pub fn reset(&self) -> SystemState {
        let baseline = SystemState::baseline();
        *self.state() = baseline.clone();
        info!("system state reset to baseline");
        baseline
    }

    /// Append a line outside any scenario (startup, reset notices).
    pub fn log(&self, category: LogCategory, message: impl Into<String>, kind: LogType) -> LogEntry {
        let entry = self.state().logs.append(category, message, kind);
        self.publish(category, &entry);
        entry
    }

    /// Stream of every entry appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.inner.events.subscribe()
    }

    pub fn pacer(&self) -> &dyn Pacer {
        self.inner.pacer.as_ref()
    }

    /// Run one scenario to completion and return its summary.
    #[instrument(skip(self, scenario), fields(scenario = %scenario.category()))]
    pub async fn run(&self, scenario: Scenario) -> Result<ScenarioReport, ScenarioExecutionError> {
        let Plan { script, report } = {
            let mut rng = self.inner.rng.lock().unwrap_or_else(PoisonError::into_inner);
            scenario.plan(&mut *rng)
        };

        let _gate = match &self.inner.run_gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        run_script(self, script).await?;
        info!("scenario completed");
        Ok(report)
    }

    /// Apply a step's mutation and, if it succeeds, its log lines, under one lock.
    pub(crate) fn apply(
        &self,
        category: LogCategory,
        mutation: Option<Mutation>,
        logs: Vec<(LogType, String)>,
    ) -> Result<(), MutationError> {
        let appended: Vec<LogEntry> = {
            let mut state = self.state();
            if let Some(mutation) = mutation {
                mutation(&mut state.counters)?;
            }
            logs.into_iter()
                .map(|(kind, message)| state.logs.append(category, message, kind))
                .collect()
        };
        for entry in &appended {
            self.publish(category, entry);
        }
        Ok(())
    }

    fn publish(&self, category: LogCategory, entry: &LogEntry) {
        // No subscribers is the common case.
        let _ = self.inner.events.send(LogEvent {
            category,
            entry: entry.clone(),
        });
    }

    fn state(&self) -> MutexGuard<'_, SystemState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::instant_harness;

    #[test]
    fn starts_zeroed() {
        let harness = instant_harness(3);
        assert_eq!(harness.counters(), Counters::default());
        assert!(harness.current().logs.is_empty());
    }

    #[test]
    fn reset_discards_counters_and_logs() {
        let harness = instant_harness(3);
        harness.log(LogCategory::Storage, "before", LogType::Info);
        harness
            .apply(
                LogCategory::Storage,
                Some(Box::new(|c: &mut Counters| c.add_containers(40))),
                Vec::new(),
            )
            .expect("apply");

        let state = harness.reset();
        assert_eq!(state.counters, Counters::BASELINE);
        assert_eq!(harness.counters(), Counters::BASELINE);
        for category in LogCategory::ALL {
            assert!(harness.current().logs.get(category).is_empty());
        }
    }

    #[test]
    fn log_is_broadcast() {
        let harness = instant_harness(3);
        let mut rx = harness.subscribe();
        let entry = harness.log(LogCategory::Security, "scan", LogType::Success);

        let event = rx.try_recv().expect("event");
        assert_eq!(event.category, LogCategory::Security);
        assert_eq!(event.entry, entry);
    }

    #[test]
    fn failed_mutation_logs_nothing() {
        let harness = instant_harness(3);
        let result = harness.apply(
            LogCategory::Deployment,
            Some(Box::new(|_: &mut Counters| -> Result<(), MutationError> {
                Err(MutationError::Rejected("nope".to_string()))
            })),
            vec![(LogType::Success, "hidden".to_string())],
        );
        assert!(result.is_err());
        assert!(harness.logs("deployment").expect("logs").is_empty());
    }

    #[test]
    fn unknown_log_category() {
        let harness = instant_harness(3);
        assert!(harness.logs("unknown-category").is_err());
    }
}
