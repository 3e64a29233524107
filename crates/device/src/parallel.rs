//! Parallel parameter fetch
//!
//! Suites that snapshot a batch of parameters (both radios' SSIDs, a set
//! of RFC flags) fetch them concurrently: each read is independent, shares
//! no state with the others, and reports its own result. Completion order
//! is not guaranteed, so every result carries its parameter name.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::error;

use converge_verifier::Observation;

use crate::error::DeviceError;
use crate::params::ParameterProtocol;

/// Fetch a batch of parameters concurrently, one task per name.
///
/// Results arrive in completion order, each tagged with its parameter
/// name. A read that fails reports its own error without affecting the
/// rest of the batch.
pub async fn fetch_parameters<P>(
    protocol: Arc<P>,
    names: Vec<String>,
) -> Vec<(String, Result<Observation, DeviceError>)>
where
    P: ParameterProtocol + 'static,
{
    let mut tasks = JoinSet::new();
    for name in names {
        let protocol = Arc::clone(&protocol);
        tasks.spawn(async move {
            let result = protocol.get(&name).await;
            (name, result)
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(entry) => results.push(entry),
            // A panicked read task loses its entry; the rest of the batch
            // still reports.
            Err(err) => error!(error = %err, "parameter fetch task failed to join"),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamType, SetStatus};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    struct StaggeredTree {
        values: HashMap<String, (Duration, String)>,
    }

    #[async_trait]
    impl ParameterProtocol for StaggeredTree {
        async fn get(&self, name: &str) -> Result<Observation, DeviceError> {
            match self.values.get(name) {
                Some((delay, value)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(Observation::value(value.clone()))
                }
                None => Err(DeviceError::unsupported(format!("unknown parameter {name}"))),
            }
        }

        async fn set(
            &self,
            _name: &str,
            _value: &str,
            _ty: ParamType,
        ) -> Result<SetStatus, DeviceError> {
            Err(DeviceError::unsupported("read-only tree"))
        }
    }

    #[tokio::test]
    async fn batch_reads_report_every_name() {
        let tree = StaggeredTree {
            values: HashMap::from([
                (
                    "Device.WiFi.SSID.10001.SSID".to_string(),
                    (Duration::from_millis(30), "RDKB-2G".to_string()),
                ),
                (
                    "Device.WiFi.SSID.10101.SSID".to_string(),
                    (Duration::from_millis(5), "RDKB-5G".to_string()),
                ),
            ]),
        };

        let names = vec![
            "Device.WiFi.SSID.10001.SSID".to_string(),
            "Device.WiFi.SSID.10101.SSID".to_string(),
            "Device.WiFi.Missing".to_string(),
        ];
        let mut results = fetch_parameters(Arc::new(tree), names).await;

        assert_eq!(results.len(), 3);
        // Completion order is not guaranteed; sort by name to assert.
        results.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            results[1].1.as_ref().unwrap().as_deref(),
            Some("RDKB-2G")
        );
        assert_eq!(
            results[2].1.as_ref().unwrap().as_deref(),
            Some("RDKB-5G")
        );
        assert!(results[0].1.is_err());
    }
}
