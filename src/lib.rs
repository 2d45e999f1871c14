//! BTMS E2E Scenario Harness
//!
//! Core engine for browser-driven back-office test suites:
//! - Convergence polling against asynchronously-updating screens
//! - Ordered scenario steps with soft-assertion semantics
//! - Per-step reporting that shows how far a wait got, not just pass/fail
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  ScenarioOrchestrator                                      │
//! │    ├── run_step(step) -> StepRecord                        │
//! │    ├── run_to_completion(steps) -> ScenarioResult          │
//! │    └── finalize() -> ScenarioResult                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  ConditionPoller                                           │
//! │    └── await_count(source) -> PollOutcome                  │
//! │          ├── Satisfied(observed)                           │
//! │          ├── PartialSatisfied(observed)                    │
//! │          └── TimedOut(observed)                            │
//! ├────────────────────────────────────────────────────────────┤
//! │  Collaborator capabilities (caller-owned)                  │
//! │    ├── CountSource { refresh, current_count }              │
//! │    └── Clock { now, sleep }                                │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Page wrappers, HTTP clients and test data loaders live outside this
//! crate; steps close over them and the poller reaches them through
//! [`CountSource`].

#![allow(async_fn_in_trait)]

pub mod error;
pub mod poll;
pub mod report;
pub mod scenario;
pub mod time;

pub use error::{HarnessError, HarnessResult};
pub use poll::{ConditionPoller, CountSource, PollConfig, PollOutcome};
pub use report::{SuiteReporter, SuiteResult};
pub use scenario::{
    ScenarioOrchestrator, ScenarioResult, ScenarioState, Step, StepRecord, StepStatus,
};
pub use time::{Clock, ManualClock, TokioClock};
