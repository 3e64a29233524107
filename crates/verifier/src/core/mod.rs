//! Core types for the verifier
//!
//! This module provides the fundamental building blocks used throughout
//! the library: the error taxonomy and the observation/outcome model.

mod error;
mod outcome;

pub use error::{VerifyError, VerifyErrorClass, VerifyResult};
pub use outcome::{Observation, PollOutcome};

/// Core constants
pub mod constants {
    use std::time::Duration;

    /// Default wait between polling attempts
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

    /// Default total time budget for one verification
    pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(90);

    /// Placeholder reported when a failed poll never observed a value
    pub const NO_OBSERVATION: &str = "<none>";
}
