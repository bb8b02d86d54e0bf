//! Buttons for section controls.

use folio_sections::Control;
use leptos::prelude::*;

/// Render one of a section's controls. Clicks hand the control back to
/// `on_activate`, which passes it to the section's `activate`.
pub fn control_button<F>(control: Control, busy: Signal<bool>, on_activate: F) -> impl IntoView
where
    F: Fn(Control) + Copy + Send + Sync + 'static,
{
    let class = format!("control control--{}", control.action());
    let action = control.action();
    let label = control.label();

    view! {
        <button
            type="button"
            class=class
            data-action=action
            disabled=move || busy.get()
            on:click=move |_| on_activate(control.clone())
        >
            {label}
        </button>
    }
}

/// Controls that never wait on a pending write.
pub fn idle() -> Signal<bool> {
    Signal::derive(|| false)
}
