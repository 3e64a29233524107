//! The bounded polling verifier
//!
//! The engine behind every eventual-consistency check in the harness: run
//! an action, evaluate a predicate, sleep, repeat until the predicate holds
//! or the wall-clock budget runs out. The loop body executes at least once
//! regardless of the budget, and the deadline is checked at loop top after
//! the body, so the run overshoots the budget by at most one interval.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::core::{Observation, PollOutcome, VerifyError, VerifyResult, constants};
use crate::predicate::Predicate;

/// Immutable configuration for one polling session.
///
/// Constructed per call site, used for exactly one run, and discarded;
/// nothing here is shared across verifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Wait between attempts; must be positive
    pub interval: Duration,
    /// Total wall-clock budget; zero means "try exactly once, no retries"
    pub max_duration: Duration,
}

impl PollConfig {
    /// Create a validated configuration. A zero interval is a programmer
    /// error: the loop would spin against the device.
    pub fn new(interval: Duration, max_duration: Duration) -> VerifyResult<Self> {
        if interval.is_zero() {
            return Err(VerifyError::invalid_config("poll interval must be positive"));
        }
        Ok(Self {
            interval,
            max_duration,
        })
    }

    /// Configuration that makes exactly one attempt
    #[must_use]
    pub fn once() -> Self {
        Self {
            interval: constants::DEFAULT_INTERVAL,
            max_duration: Duration::ZERO,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: constants::DEFAULT_INTERVAL,
            max_duration: constants::DEFAULT_MAX_DURATION,
        }
    }
}

/// Bounded polling verifier: one [`PollConfig`] plus one [`Predicate`].
#[derive(Debug, Clone)]
pub struct Verifier {
    config: PollConfig,
    predicate: Predicate,
}

impl Verifier {
    /// Create a verifier from a validated config and a predicate
    #[must_use]
    pub fn new(config: PollConfig, predicate: Predicate) -> Self {
        Self { config, predicate }
    }

    /// The configuration this verifier runs with
    #[must_use]
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Run the polling loop until the predicate holds or the budget runs
    /// out.
    ///
    /// The action produces one [`Observation`] per attempt. Transient
    /// "not ready yet" conditions (device unreachable this attempt, file
    /// not found, blank command output) are expressed as
    /// [`Observation::absent`] and retried; an `Err` from the action is an
    /// unrecoverable environment or precondition failure and aborts the
    /// run immediately. Once an attempt is in flight it is never
    /// interrupted — the loop only decides whether to start another one.
    pub async fn verify<F, Fut>(&self, mut action: F) -> VerifyResult<PollOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = VerifyResult<Observation>>,
    {
        let start = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_observed: Option<String> = None;

        loop {
            attempts += 1;
            debug!(
                attempt = attempts,
                predicate = self.predicate.name(),
                "polling device state"
            );

            let observation = action().await?;
            if let Some(value) = observation.as_deref() {
                last_observed = Some(value.to_string());
            }

            if self.predicate.is_satisfied(&observation) {
                let elapsed = start.elapsed();
                info!(
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "condition satisfied"
                );
                return Ok(PollOutcome::success(attempts, elapsed, last_observed));
            }

            // An interval longer than the whole budget means the next
            // attempt could never start before the deadline: one best-effort
            // try is all such configs get.
            if start.elapsed() >= self.config.max_duration
                || self.config.interval > self.config.max_duration
            {
                let elapsed = start.elapsed();
                warn!(
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    last_observed = last_observed.as_deref().unwrap_or("<none>"),
                    "condition not met before deadline"
                );
                return Ok(PollOutcome::timed_out(attempts, elapsed, last_observed));
            }

            sleep(self.config.interval).await;
        }
    }
}

/// Poll an action until the predicate holds, within the budget.
///
/// Convenience entry point for one-shot call sites; equivalent to
/// constructing a [`Verifier`] and calling [`Verifier::verify`].
pub async fn poll_until<F, Fut>(
    config: PollConfig,
    predicate: Predicate,
    action: F,
) -> VerifyResult<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VerifyResult<Observation>>,
{
    Verifier::new(config, predicate).verify(action).await
}
