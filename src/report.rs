//! Suite aggregation and result reporting
//!
//! Folds individual scenario results into a suite summary, renders the
//! per-step listing a failing CI run gets pasted into a ticket, and writes
//! the JSON file the pipeline archives.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::HarnessResult;
use crate::scenario::{ScenarioResult, StepStatus};

/// Result of running a set of scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    /// Human-readable listing, one line per step.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for scenario in &self.results {
            let verdict = if scenario.passed() { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "{} [{}] ({} ms)\n",
                scenario.name, verdict, scenario.duration_ms
            ));

            for step in &scenario.steps {
                match &step.status {
                    StepStatus::Pass => {
                        out.push_str(&format!("  ✓ {} ({} ms)\n", step.name, step.duration_ms));
                    }
                    StepStatus::Fail { reason } => {
                        out.push_str(&format!(
                            "  ✗ {} ({} ms) - {}\n",
                            step.name, step.duration_ms, reason
                        ));
                    }
                }
            }
        }

        out.push_str(&format!(
            "\nSuite: {} passed, {} failed of {} ({} ms)\n",
            self.passed, self.failed, self.total, self.duration_ms
        ));
        out
    }

    /// Write results as pretty JSON into `output_dir`.
    pub fn write_json(&self, output_dir: &Path) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("scenario-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Collects scenario results as they finish.
pub struct SuiteReporter {
    started_at: DateTime<Utc>,
    started: Instant,
    results: Vec<ScenarioResult>,
}

impl SuiteReporter {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            results: Vec::new(),
        }
    }

    /// Record one finished scenario.
    pub fn record(&mut self, result: ScenarioResult) {
        if result.passed() {
            info!("✓ {} ({} ms)", result.name, result.duration_ms);
        } else {
            error!(
                "✗ {} - {} failing step(s)",
                result.name,
                result.failures().count()
            );
        }
        self.results.push(result);
    }

    pub fn finish(self) -> SuiteResult {
        let duration_ms = self.started.elapsed().as_millis() as u64;
        let passed = self.results.iter().filter(|r| r.passed()).count();
        let failed = self.results.len() - passed;

        info!(
            "Suite finished: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        SuiteResult {
            started_at: self.started_at,
            total: self.results.len(),
            passed,
            failed,
            duration_ms,
            results: self.results,
        }
    }
}

impl Default for SuiteReporter {
    fn default() -> Self {
        Self::new()
    }
}
