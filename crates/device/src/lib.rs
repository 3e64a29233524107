//! # Converge Device
//!
//! Capability traits for the external collaborators a gateway test harness
//! talks to — remote command execution, the device parameter protocol with
//! its local fallback, and log search — plus convenience wrappers that tie
//! them to the bounded polling verifier in `converge-verifier`.
//!
//! The wire protocols behind these traits (WebPA, SNMP, SSH) are owned by
//! external SDKs; this crate only fixes the seams the verifier polls
//! through. Implementations are expected to report transient "no data this
//! attempt" conditions as [`Observation::absent`] and reserve errors for
//! failures that should abort a verification outright.
//!
//! [`Observation::absent`]: converge_verifier::Observation::absent

#![warn(missing_docs)]

mod error;

pub mod command;
pub mod logs;
pub mod parallel;
pub mod params;

// Public API
pub use command::{CommandExecutor, Console, run_until};
pub use error::DeviceError;
pub use logs::{LogSearcher, search_until_found};
pub use parallel::fetch_parameters;
pub use params::{ConnectivityState, ParamClient, ParamType, ParameterProtocol, SetStatus};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::command::{CommandExecutor, Console};
    pub use crate::error::DeviceError;
    pub use crate::logs::LogSearcher;
    pub use crate::params::{ConnectivityState, ParamClient, ParamType, ParameterProtocol, SetStatus};
    pub use converge_verifier::prelude::*;
}
