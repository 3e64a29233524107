//! Device parameter protocol seam and fallback routing
//!
//! Gateways expose their TR-181 parameter tree over a cloud protocol
//! (WebPA) and over a local command-line path (DMCLI). The cloud path is
//! preferred but can lose connectivity mid-suite; once that happens every
//! subsequent call should go straight to the local path instead of
//! burning a timeout per parameter. [`ParamClient`] implements that
//! routing around an explicit [`ConnectivityState`] flag owned by the
//! caller.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use converge_verifier::{
    Observation, PollConfig, PollOutcome, Predicate, VerifyResult, patterns, poll_until,
};

use crate::error::DeviceError;

/// TR-181 value type carried alongside a parameter write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    /// Free-form string value
    String,
    /// Signed integer value
    Int,
    /// Unsigned integer value
    UnsignedInt,
    /// Boolean value ("true"/"false")
    Boolean,
    /// ISO-8601 date-time value
    DateTime,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Int => f.write_str("int"),
            Self::UnsignedInt => f.write_str("uint"),
            Self::Boolean => f.write_str("boolean"),
            Self::DateTime => f.write_str("dateTime"),
        }
    }
}

/// Protocol-level status of a parameter write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetStatus {
    /// The device accepted the write
    Applied,
    /// The device rejected the write with a protocol status code
    Rejected {
        /// Protocol status code (e.g. 520 for an invalid parameter name)
        code: u16,
    },
}

impl SetStatus {
    /// Whether the write was accepted
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Get/set access to the device parameter tree.
///
/// Both the cloud protocol and its local fallback implement this; the
/// engine never sees which one answered. A `get` with no data this
/// attempt returns [`Observation::absent`]; errors abort verification.
#[async_trait]
pub trait ParameterProtocol: Send + Sync {
    /// Read one parameter value
    async fn get(&self, name: &str) -> Result<Observation, DeviceError>;

    /// Write one parameter value
    async fn set(&self, name: &str, value: &str, ty: ParamType)
    -> Result<SetStatus, DeviceError>;
}

/// Explicit connectivity circuit breaker for the primary protocol.
///
/// A cheaply clonable handle owned by the caller; once marked broken it
/// stays broken for the lifetime of the handle, and every clone observes
/// the same state. Tests trip it directly instead of reaching for process
/// globals.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityState(Arc<AtomicBool>);

impl ConnectivityState {
    /// Fresh state with the primary protocol considered healthy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the primary protocol's connectivity as broken
    pub fn mark_broken(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the primary protocol's connectivity is broken
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parameter client routing between a primary protocol and its fallback.
///
/// Reads and writes go to the primary until the [`ConnectivityState`]
/// flag trips; a transport failure on the primary trips the flag and
/// retries the same call on the fallback. Non-transport errors propagate
/// untouched — a bad parameter name is bad on both paths.
pub struct ParamClient<P, F> {
    primary: P,
    fallback: F,
    connectivity: ConnectivityState,
}

impl<P, F> ParamClient<P, F>
where
    P: ParameterProtocol,
    F: ParameterProtocol,
{
    /// Build a client over a primary protocol, a fallback, and a
    /// caller-owned connectivity flag
    pub fn new(primary: P, fallback: F, connectivity: ConnectivityState) -> Self {
        Self {
            primary,
            fallback,
            connectivity,
        }
    }

    /// The connectivity flag this client consults
    #[must_use]
    pub fn connectivity(&self) -> &ConnectivityState {
        &self.connectivity
    }

    /// Read one parameter, routing to the fallback when the primary's
    /// connectivity is broken
    pub async fn get(&self, name: &str) -> Result<Observation, DeviceError> {
        if self.connectivity.is_broken() {
            debug!(name, "primary connectivity broken; reading via fallback");
            return self.fallback.get(name).await;
        }
        match self.primary.get(name).await {
            Ok(observation) => Ok(observation),
            Err(err) if err.is_transport() => {
                warn!(name, error = %err, "primary transport failed; switching to fallback");
                self.connectivity.mark_broken();
                self.fallback.get(name).await
            }
            Err(err) => Err(err),
        }
    }

    /// Write one parameter, routing to the fallback when the primary's
    /// connectivity is broken
    pub async fn set(
        &self,
        name: &str,
        value: &str,
        ty: ParamType,
    ) -> Result<SetStatus, DeviceError> {
        if self.connectivity.is_broken() {
            debug!(name, "primary connectivity broken; writing via fallback");
            return self.fallback.set(name, value, ty).await;
        }
        match self.primary.set(name, value, ty).await {
            Ok(status) => Ok(status),
            Err(err) if err.is_transport() => {
                warn!(name, error = %err, "primary transport failed; switching to fallback");
                self.connectivity.mark_broken();
                self.fallback.set(name, value, ty).await
            }
            Err(err) => Err(err),
        }
    }

    /// Poll a parameter until its value equals `expected`
    /// (case-insensitive), within the budget
    pub async fn verify_value(
        &self,
        name: &str,
        expected: &str,
        config: PollConfig,
    ) -> VerifyResult<PollOutcome> {
        let name = name.to_string();
        poll_until(config, Predicate::equals(expected), move || {
            let name = name.clone();
            async move {
                let observation = self.get(&name).await?;
                Ok(observation)
            }
        })
        .await
    }

    /// Write a parameter, then poll its readback until the value sticks.
    ///
    /// A write the device rejects short-circuits with a zero-attempt
    /// failed outcome; the readback poll never starts.
    pub async fn set_then_verify(
        &self,
        name: &str,
        value: &str,
        ty: ParamType,
        config: PollConfig,
    ) -> VerifyResult<PollOutcome> {
        let read_name = name.to_string();
        patterns::set_then_verify(
            config,
            value,
            async {
                let status = self.set(name, value, ty).await?;
                if let SetStatus::Rejected { code } = status {
                    debug!(name, code, "device rejected the parameter write");
                }
                Ok(status.is_applied())
            },
            move || {
                let name = read_name.clone();
                async move {
                    let observation = self.get(&name).await?;
                    Ok(observation)
                }
            },
        )
        .await
    }
}
