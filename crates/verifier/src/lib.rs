//! # Converge Verifier
//!
//! A bounded polling verifier for device test harnesses: repeatedly execute
//! an observation against a device under test and verify that its state
//! eventually satisfies a condition, within a fixed wall-clock budget.
//!
//! ## Quick Start
//!
//! ```rust
//! use converge_verifier::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), VerifyError> {
//!     let config = PollConfig::new(Duration::from_secs(1), Duration::from_secs(30))?;
//!
//!     let outcome = poll_until(config, Predicate::equals("Up"), || async {
//!         // Read the interface status from the device here.
//!         Ok(Observation::value("Up"))
//!     })
//!     .await?;
//!
//!     assert!(outcome.succeeded);
//!     Ok(())
//! }
//! ```
//!
//! The verifier makes at least one attempt for any budget (a zero budget
//! means "try exactly once"), terminates on the first satisfied attempt,
//! and overshoots the budget by at most one poll interval. A missed
//! deadline is reported as a structured [`PollOutcome`], not an error, so
//! callers decide whether it is a hard failure or a soft precondition miss.

#![warn(missing_docs)]

// Core module with fundamental types
pub mod core;

// Predicate evaluation and the polling engine
pub mod predicate;
pub mod verifier;

// Composite patterns built on the verifier
pub mod patterns;

// Public API - core types
pub use self::core::{Observation, PollOutcome, VerifyError, VerifyErrorClass, VerifyResult};

// Public API - engine
pub use predicate::{Comparator, Predicate};
pub use verifier::{PollConfig, Verifier, poll_until};

// Public API - patterns
pub use patterns::{TimestampGate, search_log, set_then_verify};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{Observation, PollOutcome, VerifyError, VerifyResult};
    pub use crate::predicate::{Comparator, Predicate};
    pub use crate::verifier::{PollConfig, Verifier, poll_until};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
