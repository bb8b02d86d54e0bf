//! Remote resource cache shared by every portfolio section.
//!
//! This crate provides:
//! - `ResourceCache` - Keyed cache with in-flight de-duplication
//! - `Snapshot` - Synchronous `{ data, is_loading }` view of one key
//! - `CacheStatus` - How a load was served
//!
//! Requests run once: a failure is reported to every waiter and nothing is
//! cached, so the next explicit load tries again.

mod error;
mod resource;

pub use error::*;
pub use resource::*;
