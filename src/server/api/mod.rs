//! Codeforces API access.
//!
//! The client turns a method name and parameters into a typed result: it borrows an
//! egress path from the [`RequestScheduler`](crate::server::proxy::RequestScheduler),
//! issues the call with a hard timeout, and decodes the `{status, result | comment}`
//! envelope into a value or an [`ApiError`](crate::server::error::api::ApiError).

pub mod client;
pub mod envelope;

pub use client::CodeforcesClient;
