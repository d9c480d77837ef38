//! Cancellable, deadline-bounded polling.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::server::util::clock::{duration_between, Clock};

/// Shortest pause between polls; a zero interval is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timing for [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Total time budget measured from the first poll.
    pub timeout: Duration,
    /// Pause between consecutive polls, at least [`MIN_POLL_INTERVAL`].
    pub interval: Duration,
}

impl PollOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }
}

/// Outcome of a poll loop, with the number of probes issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome<T> {
    pub value: Option<T>,
    pub polls: u32,
    pub cancelled: bool,
}

/// Repeatedly runs `probe` until it yields a value, the deadline passes, or `cancel` fires.
///
/// Probes happen at `0, interval, 2 * interval, ...` and the last one lands exactly on the
/// deadline, so a loop that never matches probes `floor(timeout / interval) + 1` times. The
/// termination condition is checked after every probe and before every sleep, and a
/// cancellation during a sleep ends the loop without probing again. Probe errors count as
/// "no match". Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
///
/// # Arguments
/// - `clock` - Time source for the deadline and the sleeps
/// - `options` - Timeout and interval
/// - `cancel` - External cancellation signal
/// - `probe` - Produces one poll attempt
///
/// # Returns
/// - `PollOutcome` - The matched value (if any) and how many probes were issued
pub async fn poll_until<T, E, F, Fut>(
    clock: &dyn Clock,
    options: PollOptions,
    cancel: &CancellationToken,
    mut probe: F,
) -> PollOutcome<T>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let started = clock.now();
    let mut polls = 0;

    loop {
        if cancel.is_cancelled() {
            return PollOutcome {
                value: None,
                polls,
                cancelled: true,
            };
        }

        polls += 1;
        match probe().await {
            Ok(Some(value)) => {
                return PollOutcome {
                    value: Some(value),
                    polls,
                    cancelled: false,
                }
            }
            Ok(None) => {}
            Err(e) => debug!("Poll attempt {} failed: {}", polls, e),
        }

        let elapsed = duration_between(started, clock.now());
        if elapsed >= options.timeout {
            return PollOutcome {
                value: None,
                polls,
                cancelled: false,
            };
        }
        if cancel.is_cancelled() {
            return PollOutcome {
                value: None,
                polls,
                cancelled: true,
            };
        }

        let pause = options
            .interval
            .max(MIN_POLL_INTERVAL)
            .min(options.timeout - elapsed);
        tokio::select! {
            _ = cancel.cancelled() => {
                return PollOutcome {
                    value: None,
                    polls,
                    cancelled: true,
                };
            }
            _ = clock.sleep(pause) => {}
        }
    }
}
