//! Composite patterns built on the bounded polling verifier
//!
//! Two compositions recur throughout gateway test suites often enough to
//! deserve names: mutate-then-poll-the-readback, and poll-a-log-search
//! with an optional timestamp-ordering gate.

pub mod log_search;
pub mod set_verify;

// Re-exports
pub use log_search::{TimestampGate, search_log};
pub use set_verify::set_then_verify;
