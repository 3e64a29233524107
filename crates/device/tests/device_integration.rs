//! Integration tests for the device collaborator seams
//!
//! Exercises the pieces together the way a test suite does: toggle a
//! parameter and poll the readback, survive a WebPA-to-DMCLI failover
//! mid-verification, and watch a log for a line newer than a trigger.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use converge_device::prelude::*;
use converge_device::{run_until, search_until_found};
use converge_verifier::TimestampGate;

fn config() -> PollConfig {
    PollConfig::new(Duration::from_millis(10), Duration::from_millis(300)).unwrap()
}

/// Parameter tree whose primary transport dies after a set number of
/// calls, the way a WebPA session drops mid-suite.
struct FlakyPrimary {
    survives: usize,
    calls: AtomicUsize,
    values: Mutex<HashMap<String, String>>,
}

impl FlakyPrimary {
    fn new(survives: usize) -> Self {
        Self {
            survives,
            calls: AtomicUsize::new(0),
            values: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ParameterProtocol for FlakyPrimary {
    async fn get(&self, name: &str) -> Result<Observation, DeviceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.survives {
            return Err(DeviceError::transport("webpa", "session dropped"));
        }
        Ok(Observation::from(
            self.values.lock().unwrap().get(name).cloned(),
        ))
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        _ty: ParamType,
    ) -> Result<SetStatus, DeviceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.survives {
            return Err(DeviceError::transport("webpa", "session dropped"));
        }
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(SetStatus::Applied)
    }
}

/// Always-healthy local tree standing in for DMCLI.
struct LocalTree {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl ParameterProtocol for LocalTree {
    async fn get(&self, name: &str) -> Result<Observation, DeviceError> {
        Ok(Observation::from(
            self.values.lock().unwrap().get(name).cloned(),
        ))
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        _ty: ParamType,
    ) -> Result<SetStatus, DeviceError> {
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(SetStatus::Applied)
    }
}

const MESH_ENABLE: &str = "Device.DeviceInfo.X_RDKCENTRAL-COM_xOpsDeviceMgmt.Mesh.Enable";

#[tokio::test]
async fn verification_survives_a_mid_poll_failover() {
    // The value only exists on the local path, so the poll cannot succeed
    // until the failover happens.
    let fallback = LocalTree {
        values: Mutex::new(HashMap::from([(MESH_ENABLE.to_string(), "true".to_string())])),
    };
    let client = ParamClient::new(FlakyPrimary::new(2), fallback, ConnectivityState::new());

    let outcome = client
        .verify_value(MESH_ENABLE, "true", config())
        .await
        .unwrap();

    assert!(outcome.succeeded);
    // Two absent reads from the primary, then the transport failure routed
    // the third read to the fallback.
    assert_eq!(outcome.attempts, 3);
    assert!(client.connectivity().is_broken());
}

#[tokio::test]
async fn set_then_verify_on_a_healthy_device() {
    let client = ParamClient::new(
        FlakyPrimary::new(usize::MAX),
        LocalTree {
            values: Mutex::new(HashMap::new()),
        },
        ConnectivityState::new(),
    );

    let outcome = client
        .set_then_verify(MESH_ENABLE, "true", ParamType::Boolean, config())
        .await
        .unwrap();

    assert!(outcome.succeeded);
    assert_eq!(outcome.last_observed.as_deref(), Some("true"));
    assert!(!client.connectivity().is_broken());
}

/// Console whose command output settles a few polls in.
struct SettlingConsole {
    calls: AtomicUsize,
}

#[async_trait]
impl CommandExecutor for SettlingConsole {
    async fn execute(&self, _console: Console, _command: &str) -> Result<Observation, DeviceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Observation::value(format!("{}", n * 10)))
    }
}

#[tokio::test]
async fn command_poll_with_numeric_threshold() {
    let console = SettlingConsole {
        calls: AtomicUsize::new(0),
    };

    let outcome = run_until(
        &console,
        Console::Secondary,
        "wl assoclist | wc -l",
        Predicate::threshold(Comparator::Ge, 20.0),
        config(),
    )
    .await
    .unwrap();

    assert!(outcome.succeeded);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.last_observed.as_deref(), Some("20"));
}

/// Log that replays an old line first, then the fresh one.
struct ReplayingLog {
    calls: AtomicUsize,
}

#[async_trait]
impl LogSearcher for ReplayingLog {
    async fn search(&self, _pattern: &str, _path: &str) -> Result<Observation, DeviceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            Ok(Observation::absent())
        } else {
            Ok(Observation::value("2024-01-26 12:00:05 WIFI_INIT_COMPLETE"))
        }
    }
}

#[tokio::test]
async fn log_search_gated_on_the_trigger_time() {
    let format = "%Y-%m-%d %H:%M:%S";
    let baseline =
        NaiveDateTime::parse_from_str("2024-01-26 12:00:00", format).unwrap();
    let gate = TimestampGate::new(
        baseline,
        format,
        r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})",
    )
    .unwrap();

    let log = ReplayingLog {
        calls: AtomicUsize::new(0),
    };
    let outcome = search_until_found(
        &log,
        "WIFI_INIT_COMPLETE",
        "/rdklogs/logs/WiFilog.txt.0",
        config(),
        Some(gate),
    )
    .await
    .unwrap();

    assert!(outcome.succeeded);
    assert_eq!(outcome.attempts, 2);
}
