//! Portfolio page components.
//!
//! Wires the section models from `folio-sections` into Leptos signals:
//! - Fetches go through one shared `ResourceCache`
//! - Results are applied with fetch tickets, so a late response for an old
//!   viewer or an unmounted section is dropped
//! - Buttons come from each section's control lists and clicks go back
//!   through the section's `activate`, so gating lives in one place
//! - Edit modals receive a `ModalCloser` and close through it exactly once

mod app;
mod control;
mod dialog;
mod profile;
mod projects;
mod state;

pub use app::{App, PortfolioPage};
#[cfg(feature = "ssr")]
pub use app::shell;
pub use profile::ProfileView;
pub use projects::ProjectsView;
pub use state::PortfolioState;

#[cfg(feature = "csr")]
pub fn mount(state: PortfolioState, is_admin: bool) {
    use leptos::prelude::*;

    leptos::mount::mount_to_body(move || {
        let is_admin = RwSignal::new(is_admin);
        view! { <App state=state is_admin=is_admin/> }
    });
}
