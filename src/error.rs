//! Error types for the scenario harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid poll configuration: {0}")]
    InvalidPollConfig(String),

    #[error("Source unavailable: {0}")]
    Source(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Scenario already finished ({state})")]
    ScenarioFinished { state: &'static str },

    #[error("Converged to {observed} of {target} before the deadline")]
    Convergence { observed: u64, target: u64 },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
