//! Sequential execution of a scenario script against the shared state.

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::state::{Counters, MutationError};
use crate::core::types::{LogCategory, LogType};
use crate::harness::Harness;

/// Counter update applied after a step's delays have elapsed.
pub type Mutation = Box<dyn FnOnce(&mut Counters) -> Result<(), MutationError> + Send>;

/// Something that takes simulated time before a step can apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A pretend `docker ...` command. Nothing is executed.
    Docker { command: String, delay: Duration },
    /// A fixed wait (health checks, traffic switches, benchmarks).
    Pause(Duration),
}

impl Invocation {
    pub fn delay(&self) -> Duration {
        match self {
            Invocation::Docker { delay, .. } => *delay,
            Invocation::Pause(delay) => *delay,
        }
    }
}

/// One delay, mutate, log unit.
#[derive(Default)]
pub struct Step {
    pub invocations: Vec<Invocation>,
    pub mutation: Option<Mutation>,
    pub logs: Vec<(LogType, String)>,
}

impl Step {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn docker(mut self, command: impl Into<String>, delay: Duration) -> Self {
        self.invocations.push(Invocation::Docker {
            command: command.into(),
            delay,
        });
        self
    }

    pub fn pause(mut self, millis: u64) -> Self {
        self.invocations
            .push(Invocation::Pause(Duration::from_millis(millis)));
        self
    }

    pub fn mutate<F>(mut self, mutation: F) -> Self
    where
        F: FnOnce(&mut Counters) -> Result<(), MutationError> + Send + 'static,
    {
        self.mutation = Some(Box::new(mutation));
        self
    }

    pub fn info(self, message: impl Into<String>) -> Self {
        self.log(LogType::Info, message)
    }

    pub fn success(self, message: impl Into<String>) -> Self {
        self.log(LogType::Success, message)
    }

    fn log(mut self, kind: LogType, message: impl Into<String>) -> Self {
        self.logs.push((kind, message.into()));
        self
    }
}

/// Ordered steps for one scenario, plus the line logged once all of them succeed.
pub struct Script {
    pub category: LogCategory,
    pub steps: Vec<Step>,
    pub completion: String,
}

impl Script {
    /// Sum of every invocation delay, before pacing scale.
    pub fn total_delay(&self) -> Duration {
        self.steps
            .iter()
            .flat_map(|step| step.invocations.iter())
            .map(Invocation::delay)
            .sum()
    }
}

/// A scenario step failed. Mutations applied before the failure are kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScenarioExecutionError {
    pub category: LogCategory,
    pub message: String,
}

/// Run every step of `script` in order, then record the pass.
///
/// The state lock is taken once per step and never held across a delay, so
/// concurrent runs interleave at delay points.
pub async fn run_script(harness: &Harness, script: Script) -> Result<(), ScenarioExecutionError> {
    debug!(
        category = %script.category,
        steps = script.steps.len(),
        total_delay_ms = script.total_delay().as_millis() as u64,
        "running script"
    );
    let Script {
        category,
        steps,
        completion,
    } = script;

    for (index, step) in steps.into_iter().enumerate() {
        for invocation in &step.invocations {
            if let Invocation::Docker { command, delay } = invocation {
                debug!(
                    category = %category,
                    step = index,
                    command = %command,
                    delay_ms = delay.as_millis() as u64,
                    "simulating docker command"
                );
            }
            harness.pacer().pause(invocation.delay()).await;
        }

        harness
            .apply(category, step.mutation, step.logs)
            .map_err(|err| fail(harness, category, err))?;
    }

    harness
        .apply(
            category,
            Some(Box::new(Counters::record_pass)),
            vec![(LogType::Success, completion)],
        )
        .map_err(|err| fail(harness, category, err))?;
    Ok(())
}

fn fail(harness: &Harness, category: LogCategory, err: MutationError) -> ScenarioExecutionError {
    let message = err.to_string();
    warn!(category = %category, error = %message, "scenario aborted");
    harness.log(category, format!("Error: {message}"), LogType::Error);
    ScenarioExecutionError { category, message }
}
