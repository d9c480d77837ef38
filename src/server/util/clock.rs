//! Time source abstraction.
//!
//! Everything that reasons about elapsed time (request spacing, cache freshness, lease
//! expiry, poll deadlines) reads time through a [`Clock`] instead of calling `Utc::now()`
//! directly, so tests can drive time deterministically with [`ManualClock`].

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Source of the current time and of suspension for a duration.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspends the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock time with tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Adds a std duration to a timestamp, saturating at the maximum representable time.
pub fn add_duration(at: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(duration)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Returns how long it is from `from` until `until`, zero if `until` is not later.
pub fn duration_between(from: DateTime<Utc>, until: DateTime<Utc>) -> Duration {
    (until - from).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Utc>,
    /// Wake-up times of tasks currently inside `sleep`, tie-broken by registration order.
    sleepers: BTreeSet<(DateTime<Utc>, u64)>,
    next_sleeper: u64,
}

/// Simulated clock for tests and dry runs.
///
/// Time only moves through [`ManualClock::advance`], [`ManualClock::set`], or a sleeping
/// task. A sleeping task waits until it holds the earliest pending wake-up time and then
/// moves the clock forward to that time, so concurrent sleepers resume in wake-up order
/// and each observes a time no earlier than the one it asked for. Sleeps never block
/// on real time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualClockState>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualClockState {
                now: start,
                sleepers: BTreeSet::new(),
                next_sleeper: 0,
            })),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        state.now = add_duration(state.now, duration);
    }

    /// Sets the clock to `now`. Moving backwards is allowed to simulate skew.
    pub fn set(&self, now: DateTime<Utc>) {
        self.lock().now = now;
    }

    fn lock(&self) -> MutexGuard<'_, ManualClockState> {
        // A panicking test thread must not wedge every other clock user.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Deregisters a sleeper even when its future is dropped mid-sleep.
struct SleeperGuard<'a> {
    clock: &'a ManualClock,
    entry: (DateTime<Utc>, u64),
}

impl Drop for SleeperGuard<'_> {
    fn drop(&mut self) {
        self.clock.lock().sleepers.remove(&self.entry);
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let entry = {
            let mut state = self.lock();
            let entry = (add_duration(state.now, duration), state.next_sleeper);
            state.next_sleeper += 1;
            state.sleepers.insert(entry);
            entry
        };
        let _guard = SleeperGuard { clock: self, entry };

        // Yield at least once before moving time so sibling tasks polled in the same
        // round can register earlier wake-ups first.
        let mut yielded = false;
        loop {
            {
                let mut state = self.lock();
                if state.now >= entry.0 {
                    return;
                }
                if yielded && state.sleepers.first() == Some(&entry) {
                    state.now = entry.0;
                    return;
                }
            }
            tokio::task::yield_now().await;
            yielded = true;
        }
    }
}
