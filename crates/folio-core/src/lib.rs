//! Core abstractions for the portfolio content layer.
//!
//! This crate provides the fundamental types shared by every section:
//! - `ViewerContext` - Capability value carrying the admin flag
//! - `ResourceKey` - The documented cache key space
//! - `PortfolioConfig` - TOML/JSON configuration

mod config;
mod context;
mod key;

pub use config::*;
pub use context::*;
pub use key::*;
