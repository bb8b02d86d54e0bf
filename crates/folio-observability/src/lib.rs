//! Observability for the portfolio content layer.
//!
//! `StructuredLogger` attaches section and cache-key context to every entry
//! and hands the formatted line to `tracing`.

mod logging;

pub use logging::*;

// Re-export level and format from folio-core for convenience
pub use folio_core::{LogFormat, LogLevel, LoggingConfig};
