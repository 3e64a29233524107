//! Poll a log search until a line appears, optionally gated on timestamp
//! ordering
//!
//! Trigger-then-watch tests capture a baseline timestamp, kick the device,
//! and poll the target log until the expected line shows up. A line that
//! was already in the log before the trigger must not count, so the
//! matched line's embedded timestamp is compared against the baseline —
//! once, after the poll succeeds, never retried.

use std::future::Future;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::warn;

use crate::core::{Observation, PollOutcome, VerifyError, VerifyResult};
use crate::predicate::Predicate;
use crate::verifier::{PollConfig, poll_until};

/// Ordering check applied to the matched log line after a successful poll.
#[derive(Debug, Clone)]
pub struct TimestampGate {
    baseline: NaiveDateTime,
    format: String,
    extract: Regex,
}

impl TimestampGate {
    /// Build a gate from a baseline, a chrono format string for the
    /// embedded timestamp, and an extraction pattern whose first capture
    /// group (or whole match, if there are no groups) isolates the
    /// timestamp text within the line. A malformed extraction pattern is
    /// a configuration error.
    pub fn new(
        baseline: NaiveDateTime,
        format: impl Into<String>,
        extract: &str,
    ) -> VerifyResult<Self> {
        let extract = Regex::new(extract).map_err(|e| {
            VerifyError::invalid_config(format!(
                "invalid timestamp extraction pattern {extract:?}: {e}"
            ))
        })?;
        Ok(Self {
            baseline,
            format: format.into(),
            extract,
        })
    }

    /// Baseline taken from the local clock, for call sites that capture
    /// "now" immediately before triggering the device.
    #[must_use]
    pub fn baseline_now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn check(&self, line: &str) -> Result<(), String> {
        let Some(captures) = self.extract.captures(line) else {
            return Err(format!(
                "matched line carries no timestamp for pattern {:?}: {line:?}",
                self.extract.as_str()
            ));
        };
        let raw = captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let stamp = NaiveDateTime::parse_from_str(raw, &self.format)
            .map_err(|e| format!("cannot parse log timestamp {raw:?} as {:?}: {e}", self.format))?;
        if stamp > self.baseline {
            Ok(())
        } else {
            Err(format!(
                "log line timestamp {stamp} is not later than baseline {}",
                self.baseline
            ))
        }
    }
}

/// Poll a log-search action until it yields a line, then apply the
/// optional timestamp gate to the matched line.
///
/// The action returns the matched line, or absent while the line has not
/// appeared. A gate rejection converts an otherwise successful outcome
/// into a failure describing why; the attempt and elapsed bookkeeping of
/// the poll is preserved.
pub async fn search_log<F, Fut>(
    config: PollConfig,
    gate: Option<TimestampGate>,
    action: F,
) -> VerifyResult<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VerifyResult<Observation>>,
{
    let outcome = poll_until(config, Predicate::Presence, action).await?;
    if !outcome.succeeded {
        return Ok(outcome);
    }
    if let Some(gate) = gate {
        let line = outcome.last_observed.as_deref().unwrap_or_default();
        if let Err(reason) = gate.check(line) {
            warn!(reason, "matched log line failed the timestamp gate");
            return Ok(outcome.rejected(reason));
        }
    }
    Ok(outcome)
}
