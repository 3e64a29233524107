//! Observation and outcome model for polling runs

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants::NO_OBSERVATION;

/// One observed value from the device, or nothing.
///
/// Command transports in this domain report "no data" in several shapes
/// (null responses, empty strings, whitespace padding around an empty
/// result); all of them normalize to the absent observation, which the
/// verifier treats as "not ready yet, retry".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation(Option<String>);

impl Observation {
    /// Observation carrying a value. Blank or whitespace-only input
    /// normalizes to absent.
    pub fn value(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(raw))
        }
    }

    /// The absent observation ("no data this attempt")
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }

    /// Whether a value was observed
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Whether nothing was observed
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the observed value, if any
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Consume the observation, yielding the value if present
    #[must_use]
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl From<Option<String>> for Observation {
    fn from(raw: Option<String>) -> Self {
        raw.map_or_else(Self::absent, Self::value)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_deref().unwrap_or(NO_OBSERVATION))
    }
}

/// Outcome of one polling verification.
///
/// Invariants upheld by the verifier:
/// - `attempts >= 1` for any run of the polling loop (a zero budget still
///   makes one attempt); composite patterns that short-circuit before the
///   poll starts report `attempts == 0`
/// - `elapsed <= max_duration + interval` (the deadline is checked at loop
///   top, so the loop overshoots by at most one interval)
/// - `succeeded == true` implies `failure.is_none()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOutcome {
    /// Whether the predicate was satisfied before the deadline
    pub succeeded: bool,
    /// Number of action invocations performed
    pub attempts: u32,
    /// Wall-clock time consumed
    pub elapsed: Duration,
    /// Last raw value observed, for diagnostics
    pub last_observed: Option<String>,
    /// Why the run failed, when it did
    pub failure: Option<String>,
}

impl PollOutcome {
    /// Outcome of a run whose predicate was satisfied
    #[must_use]
    pub fn success(attempts: u32, elapsed: Duration, last_observed: Option<String>) -> Self {
        Self {
            succeeded: true,
            attempts,
            elapsed,
            last_observed,
            failure: None,
        }
    }

    /// Outcome of a run that reached its deadline without satisfaction
    #[must_use]
    pub fn timed_out(attempts: u32, elapsed: Duration, last_observed: Option<String>) -> Self {
        let seen = last_observed.as_deref().unwrap_or(NO_OBSERVATION);
        let failure = format!(
            "condition not met after {attempts} attempts over {elapsed:?}; last observed: {seen}"
        );
        Self {
            succeeded: false,
            attempts,
            elapsed,
            last_observed,
            failure: Some(failure),
        }
    }

    /// Outcome of a composite run that failed before its poll stage
    /// started (e.g. the mutating half of set-then-verify was rejected);
    /// `attempts` is 0 because no poll attempt was made.
    #[must_use]
    pub fn aborted_before_poll(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            attempts: 0,
            elapsed: Duration::ZERO,
            last_observed: None,
            failure: Some(reason.into()),
        }
    }

    /// Replace a success with a post-poll failure (used by the log-search
    /// timestamp gate, which can reject a line the predicate accepted)
    #[must_use]
    pub fn rejected(mut self, reason: impl Into<String>) -> Self {
        self.succeeded = false;
        self.failure = Some(reason.into());
        self
    }
}
