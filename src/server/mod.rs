//! Resilient access layer for the Codeforces API.
//!
//! Every upstream call is spread over a pool of egress paths with per-path request
//! spacing, decoded into typed results, and served through a durable cache that falls
//! back to the last good payload when the upstream fails. Duties that must run in one
//! process only are guarded by leases stored next to the cache.
//!
//! # Architecture
//!
//! The crate follows a layered architecture with clear separation of concerns:
//!
//! - **Proxy Layer** (`proxy/`) - Egress paths, proxy list loading, and the request scheduler
//! - **API Layer** (`api/`) - Codeforces client and response envelope decoding
//! - **Service Layer** (`service/`) - Cache-with-fallback orchestration, data services, leases
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Services shared by the scheduled jobs
//! - **Startup** (`startup`) - Initialization of database, HTTP client, and request scheduler
//! - **Scheduler** (`scheduler/`) - Cron jobs for lease heartbeats and contest reminders
//! - **Utilities** (`util/`) - Clock abstraction, proxy line parsing, cancellable polling
//!
//! # Request Flow
//!
//! 1. **Service** reads the cache entry and returns it while it is fresh
//! 2. **Client** asks the scheduler for the next egress path and its next free slot
//! 3. **Scheduler** waits for the slot, then runs the request on that path
//! 4. **Client** decodes the envelope into a result or a typed error
//! 5. **Service** stores fresh data, or serves the expired entry flagged stale on failure

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod proxy;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
