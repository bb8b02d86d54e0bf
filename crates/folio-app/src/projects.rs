//! Project grid component.

use folio_cache::ResourceCache;
use folio_core::ViewerContext;
use folio_data::{Project, ProjectId, ProjectStore};
use folio_sections::{Control, ControlOutcome, ModalCloser, ModalOutcome, ProjectsSection, SKELETON_CARDS};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::control::control_button;
use crate::dialog::{confirm_dialog, edit_dialog};
use crate::state::PortfolioState;

fn refresh_projects(section: RwSignal<ProjectsSection>, cache: StoredValue<ResourceCache>) {
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
        let result = cache.get::<Vec<Project>>(ticket.key()).await;
        section.try_update(|s| s.settle(ticket, result));
    });
}

#[component]
pub fn ProjectsView(state: PortfolioState, #[prop(into)] is_admin: Signal<bool>) -> impl IntoView {
    let viewer = ViewerContext::from_admin_flag(is_admin.get_untracked());
    let section = RwSignal::new(ProjectsSection::new(viewer, &state.config));
    let closer = StoredValue::new(None::<ModalCloser>);
    let cache = StoredValue::new(state.cache);
    let api = StoredValue::new(state.api);
    let deleting = RwSignal::new(false);

    Effect::new(move |_| {
        let viewer = ViewerContext::from_admin_flag(is_admin.get());
        section.update(|s| s.set_viewer(viewer));
        if !viewer.is_admin() {
            closer.set_value(None);
        }
        refresh_projects(section, cache);
    });

    on_cleanup(move || {
        section.try_update(ProjectsSection::unmount);
    });

    let close = move |outcome: ModalOutcome| {
        let Some(handle) = closer.try_update_value(Option::take).flatten() else {
            return;
        };
        if outcome == ModalOutcome::Saved {
            let key = section.with_untracked(ProjectsSection::resource_key);
            cache.with_value(|c| c.invalidate(key));
        }
        section.update(|s| {
            s.on_modal_closed(handle.close(outcome));
        });
        refresh_projects(section, cache);
    };

    let persist_delete = move |id: ProjectId| {
        deleting.set(true);
        let api = api.get_value();
        spawn_local(async move {
            let result = api.delete_project(&id).await;
            cache.try_with_value(|cache| {
                section.try_update(|s| s.finish_delete(id, result, cache));
            });
            deleting.try_set(false);
            refresh_projects(section, cache);
        });
    };

    // Every button of the section lands here; the section decides.
    let activate = move |control: Control| {
        if deleting.get_untracked() {
            return;
        }
        let Some(Ok(outcome)) = section.try_update(|s| s.activate(control)) else {
            return;
        };
        match outcome {
            ControlOutcome::Modal(activation) => {
                if let Some(handle) = activation.into_closer() {
                    closer.set_value(Some(handle));
                }
            }
            ControlOutcome::PersistDelete(id) => persist_delete(id),
            ControlOutcome::DeleteRequested(_) | ControlOutcome::DeleteCancelled(_) => {}
        }
    };

    view! {
        {move || section.with(|s| {
            if s.query().is_pending() {
                return view! { <ProjectsSkeleton/> }.into_any();
            }

            let header = s
                .header_controls()
                .into_iter()
                .map(|c| control_button(c, deleting.into(), activate))
                .collect::<Vec<_>>();
            let body = if s.projects().is_empty() {
                view! { <p class="projects-empty">"No projects yet."</p> }.into_any()
            } else {
                let cards = s
                    .projects()
                    .iter()
                    .map(|p| project_card(p.clone(), s.card_controls(&p.id), deleting.into(), activate))
                    .collect::<Vec<_>>();
                view! { <div class="projects-grid">{cards}</div> }.into_any()
            };

            view! {
                <section id="projects" class="projects">
                    <div class="projects-header">
                        <h2>"Projects"</h2>
                        {header}
                    </div>
                    {body}
                </section>
            }
            .into_any()
        })}
        {move || section.with(|s| {
            let id = s.pending_delete()?;
            let controls = s.confirm_controls();
            if controls.is_empty() {
                return None;
            }
            let title = s
                .find(id)
                .map(|p| p.title.clone())
                .unwrap_or_else(|| "this project".to_string());
            Some(confirm_dialog(title, controls, deleting.into(), activate))
        })}
        {move || section.with(|s| {
            s.dispatcher().is_open().then(|| {
                let heading = if s.dispatcher().target().is_some() { "Edit Project" } else { "New Project" };
                edit_dialog(heading.to_string(), project_form(s.dispatcher().target()), close)
            })
        })}
    }
}

/// Link targets shown on a card: (project link, source link).
fn card_links(project: &Project) -> (Option<String>, Option<String>) {
    let present = |url: &str| Some(url.trim()).filter(|u| !u.is_empty()).map(str::to_string);
    (present(&project.project_url), present(&project.github_url))
}

fn project_card<F>(project: Project, controls: Vec<Control>, busy: Signal<bool>, on_activate: F) -> impl IntoView
where
    F: Fn(Control) + Copy + Send + Sync + 'static,
{
    let (project_link, source_link) = card_links(&project);
    let image = Some(project.image_url.clone())
        .filter(|url| !url.trim().is_empty())
        .map(|src| view! { <img src=src alt=project.title.clone() class="project-image"/> });

    let overlay = (!controls.is_empty()).then(|| {
        view! {
            <div class="project-admin">
                {controls
                    .into_iter()
                    .map(|c| control_button(c, busy, on_activate))
                    .collect::<Vec<_>>()}
            </div>
        }
    });

    let tags = project
        .technologies
        .into_iter()
        .map(|t| view! { <span class="tech-tag">{t}</span> })
        .collect::<Vec<_>>();

    view! {
        <article class="project-card" data-project-id=project.id.to_string()>
            {image}
            {overlay}
            <h3 class="project-title">{project.title}</h3>
            <p class="project-description">{project.description}</p>
            <div class="project-tags">{tags}</div>
            <div class="project-links">
                {project_link.map(|href| view! {
                    <a href=href class="project-link" target="_blank" rel="noopener noreferrer">"View Project"</a>
                })}
                {source_link.map(|href| view! {
                    <a href=href class="project-github" target="_blank" rel="noopener noreferrer">"Source"</a>
                })}
            </div>
        </article>
    }
}

fn project_form(target: Option<&Project>) -> AnyView {
    let title = target.map(|p| p.title.clone()).unwrap_or_default();
    let description = target.map(|p| p.description.clone()).unwrap_or_default();
    let technologies = target.map(|p| p.technologies.join(", ")).unwrap_or_default();

    view! {
        <form class="edit-project">
            <label>"Title" <input type="text" name="title" value=title/></label>
            <label>"Description" <textarea name="description">{description}</textarea></label>
            <label>"Technologies" <input type="text" name="technologies" value=technologies/></label>
        </form>
    }
    .into_any()
}

#[component]
fn ProjectsSkeleton() -> impl IntoView {
    view! {
        <section class="projects projects--loading" aria-busy="true">
            <div class="projects-grid">
                {(0..SKELETON_CARDS)
                    .map(|_| view! {
                        <div class="project-card project-card--skeleton">
                            <div class="skeleton skeleton--image"></div>
                            <div class="skeleton skeleton--title"></div>
                            <div class="skeleton skeleton--text"></div>
                        </div>
                    })
                    .collect::<Vec<_>>()}
            </div>
        </section>
    }
}
