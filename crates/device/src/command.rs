//! Remote command execution seam

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use converge_verifier::{Observation, PollConfig, PollOutcome, Predicate, VerifyResult, poll_until};

use crate::error::DeviceError;

/// Which processor console a command targets. Gateway SoCs expose a main
/// (ARM) console and a secondary (Atom) console with different views of
/// the filesystem and process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Console {
    /// The main processor console
    Main,
    /// The secondary processor console
    Secondary,
}

impl fmt::Display for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// One remote command execution against the device.
///
/// Implementations wrap whatever transport the harness uses (SSH, serial,
/// vendor SDK). Blank output and "no such file"-style markers are
/// reported as [`Observation::absent`]; errors are reserved for transport
/// failures that should abort a verification.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run one command on the given console and return its output
    async fn execute(&self, console: Console, command: &str)
    -> Result<Observation, DeviceError>;
}

/// Poll a command on the device until its output satisfies the predicate.
pub async fn run_until<E>(
    executor: &E,
    console: Console,
    command: &str,
    predicate: Predicate,
    config: PollConfig,
) -> VerifyResult<PollOutcome>
where
    E: CommandExecutor + ?Sized,
{
    let command = command.to_string();
    poll_until(config, predicate, move || {
        let command = command.clone();
        async move {
            let observation = executor.execute(console, &command).await?;
            Ok(observation)
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct UptimeConsole {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandExecutor for UptimeConsole {
        async fn execute(
            &self,
            console: Console,
            command: &str,
        ) -> Result<Observation, DeviceError> {
            assert_eq!(console, Console::Main);
            assert_eq!(command, "cat /proc/uptime | cut -d' ' -f1");
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            // The box is still booting for the first two reads.
            if n < 2 {
                Ok(Observation::absent())
            } else {
                Ok(Observation::value("312.44"))
            }
        }
    }

    #[tokio::test]
    async fn command_output_is_polled_until_it_appears() {
        let executor = UptimeConsole {
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let config =
            PollConfig::new(Duration::from_millis(10), Duration::from_millis(300)).unwrap();

        let outcome = run_until(
            &executor,
            Console::Main,
            "cat /proc/uptime | cut -d' ' -f1",
            Predicate::Presence,
            config,
        )
        .await
        .unwrap();

        assert!(outcome.succeeded);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.last_observed.as_deref(), Some("312.44"));
    }
}
