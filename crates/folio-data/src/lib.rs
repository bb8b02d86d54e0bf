//! Data access layer for portfolio content.
//!
//! This crate provides:
//! - `Profile` / `Project` - Typed payloads validated at the boundary
//! - `Transport` - Outbound HTTP seam (reqwest-backed `HttpTransport`)
//! - `PortfolioApi` - Read endpoints by `ResourceKey`, plus `ProjectStore`
//! - `RetryPolicy` - Retry strategies (the content layer runs with none)

mod api;
mod error;
mod model;
mod retry;
mod transport;

pub use api::*;
pub use error::*;
pub use model::*;
pub use retry::*;
pub use transport::*;
