//! Predicate evaluation over device observations
//!
//! A [`Predicate`] maps one [`Observation`] to "did we succeed". Evaluation
//! is pure: the same observation always yields the same answer, and nothing
//! here performs I/O or panics. An absent observation never satisfies any
//! predicate — presence is checked before the variant-specific rule.

use regex::Regex;

use crate::core::{Observation, VerifyError, VerifyResult};

/// Success condition evaluated against each polled observation
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Case-insensitive string equality. Device parameter values in this
    /// domain compare case-insensitively ("true" vs "TRUE").
    Equals(String),
    /// The observation contains a match for the pattern
    Pattern(Regex),
    /// Any value was observed at all ("file exists", "log line appeared")
    Presence,
    /// The observation parses as a number and compares against a bound;
    /// a parse failure is predicate-false, never an error
    Threshold(Comparator, f64),
}

/// Numeric comparison direction for [`Predicate::Threshold`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Strictly greater than the bound
    Gt,
    /// Greater than or equal to the bound
    Ge,
    /// Strictly less than the bound
    Lt,
    /// Less than or equal to the bound
    Le,
    /// Equal to the bound (within `f64::EPSILON`)
    Eq,
}

impl Comparator {
    fn holds(self, observed: f64, bound: f64) -> bool {
        match self {
            Self::Gt => observed > bound,
            Self::Ge => observed >= bound,
            Self::Lt => observed < bound,
            Self::Le => observed <= bound,
            Self::Eq => (observed - bound).abs() < f64::EPSILON,
        }
    }
}

impl Predicate {
    /// Case-insensitive equality against an expected value
    pub fn equals(expected: impl Into<String>) -> Self {
        Self::Equals(expected.into())
    }

    /// Pattern-containment predicate. A malformed pattern is a programmer
    /// error and surfaces immediately as [`VerifyError::InvalidConfig`]
    /// rather than being swallowed mid-poll.
    pub fn pattern(pattern: &str) -> VerifyResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            VerifyError::invalid_config(format!("invalid predicate pattern {pattern:?}: {e}"))
        })?;
        Ok(Self::Pattern(regex))
    }

    /// Numeric threshold predicate
    #[must_use]
    pub fn threshold(comparator: Comparator, bound: f64) -> Self {
        Self::Threshold(comparator, bound)
    }

    /// Evaluate the predicate against one observation
    #[must_use]
    pub fn is_satisfied(&self, observation: &Observation) -> bool {
        let Some(value) = observation.as_deref() else {
            return false;
        };
        match self {
            Self::Equals(expected) => value.trim().eq_ignore_ascii_case(expected.trim()),
            Self::Pattern(regex) => regex.is_match(value),
            Self::Presence => true,
            Self::Threshold(comparator, bound) => value
                .trim()
                .parse::<f64>()
                .is_ok_and(|observed| comparator.holds(observed, *bound)),
        }
    }

    /// Predicate name for observability
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::Pattern(_) => "pattern",
            Self::Presence => "presence",
            Self::Threshold(..) => "threshold",
        }
    }
}
