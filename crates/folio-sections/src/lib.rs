//! Admin-gated content sections for the portfolio page.
//!
//! Each section fetches its role-appropriate resource through the shared
//! `ResourceCache` and lists the edit `Control`s the viewer may use: none
//! for visitors or while loading. Views render exactly those controls and
//! hand clicks back through `activate`, which drives the section's
//! `EditDispatcher` (at most one open modal).
//!
//! ```rust,ignore
//! let mut section = ProjectsSection::new(ViewerContext::admin(), &config);
//! section.load(&cache).await;
//!
//! for control in section.header_controls() {
//!     if let ControlOutcome::Modal(Activation::Opened(closer)) = section.activate(control)? {
//!         // hand `closer` to the edit modal; it calls `closer.close(..)` once
//!     }
//! }
//! ```

mod control;
mod error;
mod intent;
mod modal;
mod profile;
mod projects;
mod query;

pub use control::*;
pub use error::*;
pub use intent::*;
pub use modal::*;
pub use profile::*;
pub use projects::*;
pub use query::*;
