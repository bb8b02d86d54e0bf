//! Application shell and page.

use leptos::prelude::*;
use leptos_meta::*;

use crate::profile::ProfileView;
use crate::projects::ProjectsView;
use crate::state::PortfolioState;

#[cfg(feature = "ssr")]
pub fn shell(state: PortfolioState, is_admin: bool) -> impl IntoView {
    let is_admin = RwSignal::new(is_admin);

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <MetaTags/>
            </head>
            <body>
                <App state=state is_admin=is_admin/>
            </body>
        </html>
    }
}

#[component]
pub fn App(state: PortfolioState, #[prop(into)] is_admin: Signal<bool>) -> impl IntoView {
    provide_meta_context();

    view! {
        <Meta name="description" content="Developer portfolio"/>
        <Title text="Portfolio"/>
        <PortfolioPage state=state is_admin=is_admin/>
    }
}

/// Profile header followed by the project grid. Both sections share the
/// state's cache, so each key is fetched once per page.
#[component]
pub fn PortfolioPage(state: PortfolioState, #[prop(into)] is_admin: Signal<bool>) -> impl IntoView {
    view! {
        <main class="portfolio">
            <ProfileView state=state.clone() is_admin=is_admin/>
            <ProjectsView state=state is_admin=is_admin/>
        </main>
    }
}
