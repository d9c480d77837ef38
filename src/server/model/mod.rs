//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary, so the
//! service layer never handles SeaORM types directly. The `codeforces` module holds the
//! typed result shapes decoded from upstream envelopes.

pub mod cache;
pub mod codeforces;
pub mod fetch;
pub mod instance_lock;
