//! Service layer for fetch orchestration and lease management.
//!
//! Services sit between consumers (duty jobs, the binary) and the data layer:
//!
//! - **Cache with fallback** (`cache`) - Serves fresh cache hits, refreshes expired
//!   entries through the API client, and falls back to the last good payload on failure
//! - **Data services** (`problem`, `rating_change`, `submission`, `contest`) - One cache
//!   domain and TTL per Codeforces data set, each tracking its most recent failure
//! - **Instance lock** (`instance_lock`) - Lease acquisition, heartbeat and release for
//!   duties that must run in exactly one process

pub mod cache;
pub mod contest;
pub mod instance_lock;
pub mod problem;
pub mod rating_change;
pub mod submission;
