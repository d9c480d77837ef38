//! Database repository layer.
//!
//! Repositories wrap SeaORM entity operations and return domain models, keeping entity
//! types out of the service layer. Every write the application makes to shared storage
//! is a single statement whose conflict or filter clause makes it atomic across
//! processes: cache writes are upserts, lease writes are conditional updates.

pub mod cache;
pub mod instance_lock;

#[cfg(test)]
mod test;
