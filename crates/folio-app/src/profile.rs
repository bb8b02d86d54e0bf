//! Profile header component.

use folio_cache::ResourceCache;
use folio_core::ViewerContext;
use folio_data::Profile;
use folio_sections::{Control, ModalCloser, ModalOutcome, ProfileSection};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::control::{control_button, idle};
use crate::dialog::edit_dialog;
use crate::state::PortfolioState;

/// Start a fetch if the section needs one. The result is applied with the
/// ticket, so it is dropped if the viewer changed or the view unmounted.
fn refresh_profile(section: RwSignal<ProfileSection>, cache: StoredValue<ResourceCache>) {
    let Some(ticket) = section
        .try_update(|s| s.needs_load().then(|| s.begin_fetch()))
        .flatten()
    else {
        return;
    };

    let Some(cache) = cache.try_get_value() else {
        return;
    };
    spawn_local(async move {
        let result = cache.get::<Profile>(ticket.key()).await;
        section.try_update(|s| s.settle(ticket, result));
    });
}

#[component]
pub fn ProfileView(state: PortfolioState, #[prop(into)] is_admin: Signal<bool>) -> impl IntoView {
    let viewer = ViewerContext::from_admin_flag(is_admin.get_untracked());
    let section = RwSignal::new(ProfileSection::new(viewer, &state.config));
    let closer = StoredValue::new(None::<ModalCloser>);
    let cache = StoredValue::new(state.cache);

    Effect::new(move |_| {
        let viewer = ViewerContext::from_admin_flag(is_admin.get());
        section.update(|s| {
            s.set_viewer(viewer);
        });
        if !viewer.is_admin() {
            closer.set_value(None);
        }
        refresh_profile(section, cache);
    });

    on_cleanup(move || {
        section.try_update(ProfileSection::unmount);
    });

    let activate = move |control: Control| {
        if let Some(Ok(activation)) = section.try_update(|s| s.activate(control)) {
            if let Some(handle) = activation.into_closer() {
                closer.set_value(Some(handle));
            }
        }
    };

    let close = move |outcome: ModalOutcome| {
        let Some(handle) = closer.try_update_value(Option::take).flatten() else {
            return;
        };
        if outcome == ModalOutcome::Saved {
            let key = section.with_untracked(ProfileSection::resource_key);
            cache.with_value(|c| c.invalidate(key));
        }
        section.update(|s| {
            s.on_modal_closed(handle.close(outcome));
        });
        refresh_profile(section, cache);
    };

    view! {
        {move || section.with(|s| {
            if s.query().is_pending() {
                return view! { <ProfileSkeleton/> }.into_any();
            }

            let (photo_control, heading_control) = place_controls(s.controls());
            let name = s.display_name().to_string();
            let title = s.display_title().to_string();
            let image = match s.display_image() {
                Some(src) => view! {
                    <img src=src.to_string() alt="Profile Photo" class="profile-image"/>
                }.into_any(),
                None => view! {
                    <div class="profile-image profile-image--placeholder"></div>
                }.into_any(),
            };

            view! {
                <section id="about" class="profile">
                    <div class="profile-photo">
                        {image}
                        {photo_control.map(|c| control_button(c, idle(), activate))}
                    </div>
                    <div class="profile-heading">
                        <h2 class="profile-name">{name}</h2>
                        <p class="profile-title">{title}</p>
                        {heading_control.map(|c| control_button(c, idle(), activate))}
                    </div>
                </section>
            }.into_any()
        })}
        {move || section.with(|s| {
            s.dispatcher().is_open().then(|| {
                edit_dialog("Edit Profile".to_string(), profile_form(s.dispatcher().target()), close)
            })
        })}
    }
}

/// Split the section's controls into the photo overlay and the heading.
fn place_controls(controls: Vec<Control>) -> (Option<Control>, Option<Control>) {
    let mut photo = None;
    let mut heading = None;
    for control in controls {
        match control {
            Control::EditPhoto => photo = Some(control),
            Control::EditProfile => heading = Some(control),
            _ => {}
        }
    }
    (photo, heading)
}

fn profile_form(target: Option<&Profile>) -> AnyView {
    let name = target.and_then(Profile::name).unwrap_or_default().to_string();
    let title = target.and_then(Profile::title).unwrap_or_default().to_string();
    let image = target.and_then(Profile::image_url).unwrap_or_default().to_string();

    view! {
        <form class="edit-profile">
            <label>"Name" <input type="text" name="name" value=name/></label>
            <label>"Title" <input type="text" name="title" value=title/></label>
            <label>"Photo URL" <input type="url" name="profileImageUrl" value=image/></label>
        </form>
    }
    .into_any()
}

#[component]
fn ProfileSkeleton() -> impl IntoView {
    view! {
        <section class="profile profile--loading" aria-busy="true">
            <div class="skeleton skeleton--avatar"></div>
            <div class="skeleton skeleton--name"></div>
            <div class="skeleton skeleton--title"></div>
        </section>
    }
}
