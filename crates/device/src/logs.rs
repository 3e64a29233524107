//! Log search seam

use async_trait::async_trait;

use converge_verifier::{
    Observation, PollConfig, PollOutcome, VerifyResult,
    patterns::{TimestampGate, search_log},
};

use crate::error::DeviceError;

/// One search over a device log file.
///
/// Implementations typically run a `grep`-equivalent on the device and
/// return the first matched line. "Pattern not present yet" and "file not
/// created yet" are both [`Observation::absent`]; errors are reserved for
/// failures that should abort a verification.
#[async_trait]
pub trait LogSearcher: Send + Sync {
    /// Search a log file for a pattern, returning the matched line
    async fn search(&self, pattern: &str, log_path: &str)
    -> Result<Observation, DeviceError>;
}

/// Poll a log search until a line appears, then apply the optional
/// timestamp gate to the matched line.
pub async fn search_until_found<S>(
    searcher: &S,
    pattern: &str,
    log_path: &str,
    config: PollConfig,
    gate: Option<TimestampGate>,
) -> VerifyResult<PollOutcome>
where
    S: LogSearcher + ?Sized,
{
    let pattern = pattern.to_string();
    let log_path = log_path.to_string();
    search_log(config, gate, move || {
        let pattern = pattern.clone();
        let log_path = log_path.clone();
        async move {
            let observation = searcher.search(&pattern, &log_path).await?;
            Ok(observation)
        }
    })
    .await
}
