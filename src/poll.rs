//! Bounded retry and polling primitives.
//!
//! Two waiting shapes recur in this harness: "try a fallible operation a fixed
//! number of times" (session bootstrap racing server startup) and "probe until
//! a condition holds or a deadline passes" (element visibility, value change
//! after input). Both are synchronous; the only suspension is the sleep
//! between attempts.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::errors::AutomationError;

/// Run `op` up to `attempts` times with a fixed `delay` between attempts.
///
/// Returns the first success, or the last error once the budget is spent. No
/// delay follows the final attempt. `attempts` of zero is treated as one.
pub fn retry_fixed<T, E>(
    attempts: u32,
    delay: Duration,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, E>
where
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);

    for attempt in 1..attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(attempt, attempts, "attempt failed: {e}");
                thread::sleep(delay);
            }
        }
    }

    // the final attempt's outcome is the caller's, success or last error
    op()
}

/// Drive `probe` until it yields a value or `timeout` passes.
///
/// The probe returns `Ok(Some(v))` when the condition holds, `Ok(None)` to
/// keep polling, or `Err` to abort immediately (a broken session is not going
/// to heal by waiting). Expiry maps to [`AutomationError::Timeout`] carrying
/// `what` for the failure message.
pub fn poll_until<T>(
    timeout: Duration,
    interval: Duration,
    what: &str,
    mut probe: impl FnMut() -> Result<Option<T>, AutomationError>,
) -> Result<T, AutomationError> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = probe()? {
            return Ok(value);
        }
        if Instant::now() >= deadline {
            return Err(AutomationError::Timeout(format!(
                "timed out after {timeout:?} waiting for {what}"
            )));
        }
        thread::sleep(interval);
    }
}
