//! Error types for device collaborators

use converge_verifier::VerifyError;
use thiserror::Error;

/// Errors raised by the device collaborator traits.
///
/// These cover failures that should abort a verification; a collaborator
/// that merely has no data this attempt returns an absent observation
/// instead.
#[derive(Error, Debug, Clone)]
pub enum DeviceError {
    /// The transport to the device failed (session dropped, endpoint
    /// unresponsive); trips the connectivity flag when it happens on a
    /// primary protocol with a fallback available
    #[error("transport failure on {endpoint}: {message}")]
    Transport {
        /// Which endpoint failed ("webpa", "ssh", ...)
        endpoint: String,
        /// Description of the failure
        message: String,
    },

    /// The device cannot be reached at all
    #[error("device unreachable: {message}")]
    Unreachable {
        /// Description of the failure
        message: String,
    },

    /// The caller-supplied device handle is unusable; a precondition miss,
    /// not a device-state mismatch
    #[error("invalid device handle: {message}")]
    InvalidHandle {
        /// What was wrong with the handle
        message: String,
    },

    /// The operation is not supported by this protocol implementation
    #[error("operation not supported: {message}")]
    Unsupported {
        /// The unsupported operation
        message: String,
    },
}

impl DeviceError {
    /// Create a transport failure
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an unreachable-device error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create an invalid-handle error
    pub fn invalid_handle(message: impl Into<String>) -> Self {
        Self::InvalidHandle {
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Whether this is a transport failure eligible for fallback routing
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<DeviceError> for VerifyError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::InvalidHandle { .. } => VerifyError::precondition(err.to_string()),
            DeviceError::Transport { .. }
            | DeviceError::Unreachable { .. }
            | DeviceError::Unsupported { .. } => VerifyError::environment(err.to_string()),
        }
    }
}
