//! Scenario orchestration - ordered steps with soft-assertion semantics
//!
//! A scenario is one business workflow (log in, create a load, accept a
//! tender) expressed as named steps. Soft steps record their failures and
//! let the run continue so a single report shows everything that broke;
//! hard steps (login, navigation) abort the scenario because nothing after
//! them would be meaningful.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{HarnessError, HarnessResult};

type StepFuture = Pin<Box<dyn Future<Output = HarnessResult<()>> + Send>>;
type StepAction = Box<dyn FnOnce() -> StepFuture + Send>;

/// A named unit of work within a scenario.
///
/// The action closes over whatever collaborators it needs (page wrappers,
/// API clients); the orchestrator never owns collaborator lifecycle.
/// Steps are built fresh for each run and consumed by it.
pub struct Step {
    name: String,
    soft: bool,
    action: StepAction,
}

impl Step {
    /// Step whose failure aborts the scenario.
    pub fn hard<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = HarnessResult<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            soft: false,
            action: Box::new(move || Box::pin(action())),
        }
    }

    /// Step whose failure is recorded without stopping the run.
    pub fn soft<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = HarnessResult<()>> + Send + 'static,
    {
        Self {
            soft: true,
            ..Self::hard(name, action)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }
}

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pass,
    Fail { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
}

impl StepRecord {
    pub fn passed(&self) -> bool {
        matches!(self.status, StepStatus::Pass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    NotStarted,
    Running,
    Completed,
    Aborted,
}

impl ScenarioState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioState::NotStarted => "not_started",
            ScenarioState::Running => "running",
            ScenarioState::Completed => "completed",
            ScenarioState::Aborted => "aborted",
        }
    }
}

/// Result of running a single scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub state: ScenarioState,
    pub steps: Vec<StepRecord>,
    pub duration_ms: u64,
}

impl ScenarioResult {
    /// Overall verdict: any recorded failure fails the scenario, soft or
    /// not.
    pub fn passed(&self) -> bool {
        self.state == ScenarioState::Completed && self.steps.iter().all(StepRecord::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|r| !r.passed())
    }
}

/// Runs named steps in order, recording each outcome.
///
/// Hard step failures transition the scenario to `Aborted` and propagate;
/// soft failures are recorded and swallowed so later steps still run.
pub struct ScenarioOrchestrator {
    name: String,
    state: ScenarioState,
    records: Vec<StepRecord>,
    started: Option<Instant>,
}

impl ScenarioOrchestrator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ScenarioState::NotStarted,
            records: Vec::new(),
            started: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ScenarioState {
        self.state
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Execute one step.
    ///
    /// Returns the step's record on pass or soft failure. A hard failure
    /// is surfaced as [`HarnessError::StepFailed`] and ends the scenario;
    /// further `run_step` calls are rejected.
    pub async fn run_step(&mut self, step: Step) -> HarnessResult<StepRecord> {
        match self.state {
            ScenarioState::Completed | ScenarioState::Aborted => {
                return Err(HarnessError::ScenarioFinished {
                    state: self.state.as_str(),
                });
            }
            ScenarioState::NotStarted => {
                self.state = ScenarioState::Running;
                self.started = Some(Instant::now());
                info!("Scenario '{}' started", self.name);
            }
            ScenarioState::Running => {}
        }

        let Step { name, soft, action } = step;
        debug!("Running step: {}", name);

        let start = Instant::now();
        let result = (action)().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let record = match result {
            Ok(()) => StepRecord {
                name,
                status: StepStatus::Pass,
                duration_ms,
            },
            Err(e) => {
                let record = StepRecord {
                    name: name.clone(),
                    status: StepStatus::Fail {
                        reason: e.to_string(),
                    },
                    duration_ms,
                };
                if soft {
                    info!("✗ {} (soft, continuing): {}", name, e);
                } else {
                    error!("✗ {} (hard stop): {}", name, e);
                    self.records.push(record);
                    self.state = ScenarioState::Aborted;
                    return Err(HarnessError::StepFailed {
                        step: name,
                        reason: e.to_string(),
                    });
                }
                record
            }
        };

        self.records.push(record.clone());
        Ok(record)
    }

    /// Drive a whole step list, folding a hard stop into the result
    /// instead of bubbling it.
    pub async fn run_to_completion(mut self, steps: Vec<Step>) -> ScenarioResult {
        for step in steps {
            if self.run_step(step).await.is_err() {
                break;
            }
        }
        self.finalize()
    }

    /// Aggregate recorded outcomes. A running (or never-started) scenario
    /// completes here; an aborted one stays aborted.
    pub fn finalize(mut self) -> ScenarioResult {
        if self.state != ScenarioState::Aborted {
            self.state = ScenarioState::Completed;
        }

        let duration_ms = self
            .started
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0);

        let failed = self.records.iter().filter(|r| !r.passed()).count();
        let passed = self.records.len() - failed;
        info!(
            "Scenario '{}' {}: {} passed, {} failed ({} ms)",
            self.name,
            self.state.as_str(),
            passed,
            failed,
            duration_ms
        );

        ScenarioResult {
            name: self.name,
            state: self.state,
            steps: self.records,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_state_names() {
        assert_eq!(ScenarioState::NotStarted.as_str(), "not_started");
        assert_eq!(ScenarioState::Aborted.as_str(), "aborted");
    }

    #[test]
    fn result_with_soft_failure_is_failed_overall() {
        let result = ScenarioResult {
            name: "tender".to_string(),
            state: ScenarioState::Completed,
            steps: vec![
                StepRecord {
                    name: "open board".to_string(),
                    status: StepStatus::Pass,
                    duration_ms: 12,
                },
                StepRecord {
                    name: "verify count".to_string(),
                    status: StepStatus::Fail {
                        reason: "expected 2 rows".to_string(),
                    },
                    duration_ms: 3,
                },
            ],
            duration_ms: 15,
        };

        assert!(!result.passed());
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn aborted_result_never_passes() {
        let result = ScenarioResult {
            name: "login".to_string(),
            state: ScenarioState::Aborted,
            steps: vec![],
            duration_ms: 0,
        };
        assert!(!result.passed());
    }

    #[test]
    fn empty_scenario_finalizes_completed() {
        let orchestrator = ScenarioOrchestrator::new("noop");
        let result = orchestrator.finalize();
        assert_eq!(result.state, ScenarioState::Completed);
        assert!(result.passed());
        assert_eq!(result.duration_ms, 0);
    }
}
