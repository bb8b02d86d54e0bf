//! Modal and confirmation shells.

use folio_sections::{Control, ModalOutcome};
use leptos::prelude::*;

use crate::control::control_button;

/// Edit modal shell. The host's form goes in `body`; both buttons report
/// through `on_close`, which the section turns into its single close signal.
pub fn edit_dialog<F>(heading: String, body: AnyView, on_close: F) -> impl IntoView
where
    F: Fn(ModalOutcome) + Copy + Send + Sync + 'static,
{
    view! {
        <div class="modal-root" role="dialog" aria-modal="true">
            <div class="modal">
                <h3 class="modal-heading">{heading}</h3>
                {body}
                <div class="modal-actions">
                    <button type="button" class="btn btn--secondary" on:click=move |_| on_close(ModalOutcome::Cancelled)>
                        "Cancel"
                    </button>
                    <button type="button" class="btn" on:click=move |_| on_close(ModalOutcome::Saved)>
                        "Save"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Delete confirmation. `controls` are the section's confirm controls;
/// they are disabled while `busy`.
pub fn confirm_dialog<F>(title: String, controls: Vec<Control>, busy: Signal<bool>, on_activate: F) -> impl IntoView
where
    F: Fn(Control) + Copy + Send + Sync + 'static,
{
    view! {
        <div class="confirm-root" role="alertdialog" aria-modal="true">
            <p>"Delete " {title} "? This cannot be undone."</p>
            {controls
                .into_iter()
                .map(|control| control_button(control, busy, on_activate))
                .collect::<Vec<_>>()}
            {move || busy.get().then(|| view! { <span class="confirm-status">"Deleting..."</span> })}
        </div>
    }
}
