//! Convergence polling - waiting out asynchronous backend effects
//!
//! Bulk operations in the back office (EDI tender processing, bulk load
//! creation) complete asynchronously; the UI only reflects progress as a
//! growing count of rows in a terminal status. [`ConditionPoller`]
//! re-observes such a counter until it reaches a target or a deadline
//! passes, re-fetching state between attempts.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::time::{Clock, TokioClock};

/// Remote counter observed by the poller.
///
/// Implementations re-fetch a screen and count matching rows, or query a
/// status endpoint. Both operations may fail while the remote is
/// mid-navigation; the poller treats such failures as retryable.
pub trait CountSource {
    /// Re-fetch the underlying state (page reload, fresh query).
    async fn refresh(&mut self) -> HarnessResult<()>;

    /// Number of items currently in the target state.
    async fn current_count(&mut self) -> HarnessResult<u64>;
}

/// Poll loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Overall deadline for convergence.
    pub max_wait: Duration,

    /// Pause between observation attempts.
    pub interval: Duration,

    /// Count at which the wait is satisfied.
    pub target_count: u64,
}

impl PollConfig {
    pub fn new(max_wait: Duration, interval: Duration, target_count: u64) -> Self {
        Self {
            max_wait,
            interval,
            target_count,
        }
    }

    fn validate(&self) -> HarnessResult<()> {
        if self.interval.is_zero() {
            return Err(HarnessError::InvalidPollConfig(
                "interval must be positive".to_string(),
            ));
        }
        if self.max_wait < self.interval {
            return Err(HarnessError::InvalidPollConfig(format!(
                "max_wait {:?} must be at least one interval {:?}",
                self.max_wait, self.interval
            )));
        }
        Ok(())
    }
}

/// How a poll ended.
///
/// Reaching the deadline is a reportable outcome, not an error; callers
/// decide whether a partial count is acceptable before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The counter reached the target.
    Satisfied(u64),

    /// Deadline passed with some progress (observed count below target).
    PartialSatisfied(u64),

    /// Deadline passed with no progress at all.
    TimedOut(u64),
}

impl PollOutcome {
    /// Final count seen by the poller.
    pub fn observed(&self) -> u64 {
        match self {
            PollOutcome::Satisfied(n)
            | PollOutcome::PartialSatisfied(n)
            | PollOutcome::TimedOut(n) => *n,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollOutcome::Satisfied(_))
    }

    /// Turn an unsatisfied outcome into a step failure that carries the
    /// observed-vs-target shortfall, so reports show how far convergence
    /// got.
    pub fn require(self, target: u64) -> HarnessResult<u64> {
        match self {
            PollOutcome::Satisfied(n) => Ok(n),
            PollOutcome::PartialSatisfied(n) | PollOutcome::TimedOut(n) => {
                Err(HarnessError::Convergence {
                    observed: n,
                    target,
                })
            }
        }
    }
}

/// Re-observes a [`CountSource`] until it converges on a target count.
pub struct ConditionPoller<C = TokioClock> {
    config: PollConfig,
    clock: C,
}

impl ConditionPoller<TokioClock> {
    pub fn new(config: PollConfig) -> Self {
        Self::with_clock(config, TokioClock)
    }
}

impl<C: Clock> ConditionPoller<C> {
    pub fn with_clock(config: PollConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Wait until `source` reports at least `target_count` items.
    ///
    /// Transient source failures are logged and retried on the next
    /// interval. A zero target is satisfied immediately without touching
    /// the source.
    pub async fn await_count<S: CountSource>(&self, source: &mut S) -> HarnessResult<PollOutcome> {
        self.config.validate()?;

        let target = self.config.target_count;
        if target == 0 {
            return Ok(PollOutcome::Satisfied(0));
        }

        let start = self.clock.now();
        let mut last_observed = 0u64;

        while self.clock.now().duration_since(start) < self.config.max_wait {
            if let Err(e) = source.refresh().await {
                warn!("Refresh failed, retrying next interval: {}", e);
                self.clock.sleep(self.config.interval).await;
                continue;
            }

            match source.current_count().await {
                Ok(count) => {
                    last_observed = count;
                    if count >= target {
                        debug!("Count reached {} (target {})", count, target);
                        return Ok(PollOutcome::Satisfied(count));
                    }
                    debug!("Count at {} of {}, waiting...", count, target);
                }
                Err(e) => {
                    warn!("Count read failed, retrying next interval: {}", e);
                }
            }

            self.clock.sleep(self.config.interval).await;
        }

        Ok(if last_observed == 0 {
            PollOutcome::TimedOut(0)
        } else {
            PollOutcome::PartialSatisfied(last_observed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_wait_s: u64, interval_s: u64, target: u64) -> PollConfig {
        PollConfig::new(
            Duration::from_secs(max_wait_s),
            Duration::from_secs(interval_s),
            target,
        )
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = config(30, 0, 2).validate().unwrap_err();
        assert!(matches!(err, HarnessError::InvalidPollConfig(_)));
    }

    #[test]
    fn max_wait_shorter_than_interval_is_rejected() {
        let err = config(1, 3, 2).validate().unwrap_err();
        assert!(matches!(err, HarnessError::InvalidPollConfig(_)));
    }

    #[test]
    fn valid_config_passes() {
        assert!(config(30, 3, 2).validate().is_ok());
    }

    #[test]
    fn require_keeps_satisfied_count() {
        assert_eq!(PollOutcome::Satisfied(2).require(2).unwrap(), 2);
    }

    #[test]
    fn require_reports_shortfall() {
        let err = PollOutcome::PartialSatisfied(1).require(2).unwrap_err();
        match err {
            HarnessError::Convergence { observed, target } => {
                assert_eq!(observed, 1);
                assert_eq!(target, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn observed_count_is_carried_by_every_variant() {
        assert_eq!(PollOutcome::Satisfied(2).observed(), 2);
        assert_eq!(PollOutcome::PartialSatisfied(1).observed(), 1);
        assert_eq!(PollOutcome::TimedOut(0).observed(), 0);
    }
}
