//! Set a value, then poll the readback until it sticks
//!
//! Parameter writes on gateway firmware are eventually consistent: the set
//! returns before the value is visible to readers, so every write in a test
//! is followed by a bounded poll of the same parameter. This wraps the two
//! halves into one call.

use std::future::Future;

use tracing::warn;

use crate::core::{Observation, PollOutcome, VerifyResult};
use crate::predicate::Predicate;
use crate::verifier::{PollConfig, poll_until};

/// Perform a mutating set, then poll a readback action until it equals the
/// value just set (case-insensitive).
///
/// The set operation resolves to `Ok(true)` when the device accepted the
/// write and `Ok(false)` when the protocol reported a failure status; a
/// reported failure short-circuits — the readback poll never starts and
/// the outcome carries `attempts == 0`. An `Err` from either half aborts
/// the whole composition.
pub async fn set_then_verify<S, F, Fut>(
    config: PollConfig,
    expected: &str,
    set: S,
    read: F,
) -> VerifyResult<PollOutcome>
where
    S: Future<Output = VerifyResult<bool>>,
    F: FnMut() -> Fut,
    Fut: Future<Output = VerifyResult<Observation>>,
{
    if !set.await? {
        warn!(expected, "set rejected by the device; readback poll skipped");
        return Ok(PollOutcome::aborted_before_poll(format!(
            "set of value {expected:?} was rejected; readback poll not started"
        )));
    }
    poll_until(config, Predicate::equals(expected), read).await
}
