use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::server::{
    proxy::{EgressPath, ProxyEndpoint},
    util::clock::{add_duration, duration_between, Clock},
};

/// Rotation cursor plus the reserved start time of each path's most recent request.
struct RotationState {
    cursor: usize,
    last_used: Vec<Option<DateTime<Utc>>>,
}

struct SchedulerInner {
    paths: Vec<EgressPath>,
    min_delay: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<RotationState>,
}

/// Hands out egress paths round-robin and spaces requests on each path.
///
/// Selecting a path and reserving its next free slot happen together under one lock, so
/// concurrent callers never claim the same slot. Waiting for the slot and running the
/// task happen outside the lock, letting requests on different paths proceed in
/// parallel. Consecutive requests on one path start at least `min_delay` apart.
///
/// Cloning is cheap and clones share the same pool.
#[derive(Clone)]
pub struct RequestScheduler {
    inner: Arc<SchedulerInner>,
}

impl RequestScheduler {
    /// Creates a scheduler over `paths`.
    ///
    /// An empty list yields a pool with exactly one direct path.
    ///
    /// # Arguments
    /// - `paths` - Egress paths; their indices should match their positions
    /// - `min_delay` - Minimum spacing between request starts on the same path
    /// - `clock` - Time source for spacing
    ///
    /// # Returns
    /// - `Ok(RequestScheduler)` - Scheduler with at least one path
    /// - `Err(reqwest::Error)` - The fallback direct client could not be built
    pub fn new(
        paths: Vec<EgressPath>,
        min_delay: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let paths = if paths.is_empty() {
            vec![EgressPath::direct(0)?]
        } else {
            paths
        };

        let state = RotationState {
            cursor: 0,
            last_used: vec![None; paths.len()],
        };

        Ok(Self {
            inner: Arc::new(SchedulerInner {
                paths,
                min_delay,
                clock,
                state: Mutex::new(state),
            }),
        })
    }

    /// Creates a scheduler with one path per proxy endpoint.
    ///
    /// Endpoints whose client cannot be built are logged and skipped. When no endpoint
    /// remains the pool falls back to the direct path.
    pub fn from_proxies(
        endpoints: Vec<ProxyEndpoint>,
        min_delay: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let mut paths = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let label = endpoint.to_string();
            match EgressPath::proxied(paths.len(), endpoint) {
                Ok(path) => paths.push(path),
                Err(e) => warn!("Skipping proxy {}: {}", label, e),
            }
        }

        Self::new(paths, min_delay, clock)
    }

    /// Number of egress paths in the pool.
    pub fn size(&self) -> usize {
        self.inner.paths.len()
    }

    pub fn min_delay(&self) -> Duration {
        self.inner.min_delay
    }

    /// All paths in pool order.
    pub fn paths(&self) -> &[EgressPath] {
        &self.inner.paths
    }

    /// Picks the next path and reserves its next free slot.
    ///
    /// # Returns
    /// - `(EgressPath, Duration)` - The chosen path and how long to wait before using it
    async fn reserve(&self) -> (EgressPath, Duration) {
        let mut state = self.inner.state.lock().await;

        let index = state.cursor;
        state.cursor = (state.cursor + 1) % self.inner.paths.len();

        let now = self.inner.clock.now();
        let start = match state.last_used[index] {
            Some(last) => add_duration(last, self.inner.min_delay).max(now),
            None => now,
        };
        state.last_used[index] = Some(start);

        (self.inner.paths[index].clone(), duration_between(now, start))
    }

    /// Runs `task` on the next egress path once that path is free.
    ///
    /// The task's output is returned unchanged; the scheduler never inspects it.
    ///
    /// # Arguments
    /// - `task` - Work to perform with the selected path
    ///
    /// # Returns
    /// - `T` - Whatever the task returned
    pub async fn schedule<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce(EgressPath) -> Fut,
        Fut: Future<Output = T>,
    {
        let (path, wait) = self.reserve().await;

        if !wait.is_zero() {
            debug!("Waiting {:?} for egress path {}", wait, path);
            self.inner.clock.sleep(wait).await;
        }

        task(path).await
    }
}
