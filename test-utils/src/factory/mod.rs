//! Factory methods for creating test data.
//!
//! This module provides factory methods for seeding rows with sensible defaults, reducing
//! boilerplate in tests that need pre-existing cache entries or lease records.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let entry = factory::cache_entry::create_cache_entry(&db).await?;
//!     let lock = factory::instance_lock::create_instance_lock(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let entry = factory::cache_entry::CacheEntryFactory::new(&db)
//!     .domain("problems")
//!     .key("problemset")
//!     .payload(r#"{"problems":[]}"#)
//!     .fetched_at(an_hour_ago)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `cache_entry` - Create cache entry rows
//! - `instance_lock` - Create instance lock rows
//! - `helpers` - Shared unique-id counter

pub mod cache_entry;
pub mod helpers;
pub mod instance_lock;

// Re-export commonly used factory functions for concise usage
pub use cache_entry::create_cache_entry;
pub use instance_lock::create_instance_lock;
