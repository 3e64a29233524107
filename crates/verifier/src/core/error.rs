//! Error types for verification runs
//!
//! Transient "not ready yet" conditions are never errors here: an absent
//! observation or an unsatisfied predicate is retried until the deadline,
//! and a missed deadline is a structured [`PollOutcome`] failure. The
//! variants below cover what genuinely aborts a run.
//!
//! [`PollOutcome`]: crate::core::PollOutcome

use thiserror::Error;

/// Errors that abort a verification run
#[derive(Error, Debug, Clone)]
pub enum VerifyError {
    /// Invalid verifier configuration (programmer error, never retried)
    #[error("invalid verifier configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration
        message: String,
    },

    /// A precondition the harness relies on does not hold; the
    /// orchestration layer maps this to "not tested" rather than "failed"
    #[error("precondition not met: {message}")]
    Precondition {
        /// The precondition that was violated
        message: String,
    },

    /// Unrecoverable environment failure (device handle invalid, transport
    /// down with no fallback); distinct from device state that has not
    /// converged yet
    #[error("environment failure: {message}")]
    Environment {
        /// Description of the failure
        message: String,
    },
}

/// Classification of a [`VerifyError`] for reporting decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyErrorClass {
    /// Misuse of the library API; fix the caller
    Configuration,
    /// A precondition miss; the covering test is not applicable
    Precondition,
    /// The test environment broke underneath the run
    Environment,
}

impl VerifyError {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create an environment error
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
            message: message.into(),
        }
    }

    /// Classify the error for reporting decisions
    #[must_use]
    pub fn classify(&self) -> VerifyErrorClass {
        match self {
            Self::InvalidConfig { .. } => VerifyErrorClass::Configuration,
            Self::Precondition { .. } => VerifyErrorClass::Precondition,
            Self::Environment { .. } => VerifyErrorClass::Environment,
        }
    }

    /// Check whether the error marks a precondition miss
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerifyError>;
