//! Projects section.

use folio_cache::{CacheError, ResourceCache};
use folio_core::{PortfolioConfig, ResourceKey, ViewerContext};
use folio_data::{FetchError, Project, ProjectId, ProjectStore};
use folio_observability::StructuredLogger;

use crate::control::{Control, ControlOutcome};
use crate::error::SectionError;
use crate::intent::{Activation, EditDispatcher};
use crate::modal::{ModalClosed, ModalOutcome};
use crate::query::{FetchTicket, SectionQuery, SettleOutcome};

/// Section name used in logs.
pub const PROJECTS_SECTION: &str = "projects";

/// Number of placeholder cards shown while loading.
pub const SKELETON_CARDS: usize = 6;

/// The project grid with add, edit and delete workflows.
///
/// Every viewer reads the same `projects` key; only the controls differ.
#[derive(Debug, Clone)]
pub struct ProjectsSection {
    viewer: ViewerContext,
    query: SectionQuery<Vec<Project>>,
    dispatcher: EditDispatcher<Project>,
    pending_delete: Option<ProjectId>,
    logger: StructuredLogger,
}

impl ProjectsSection {
    pub fn new(viewer: ViewerContext, config: &PortfolioConfig) -> Self {
        Self {
            viewer,
            query: SectionQuery::new(ResourceKey::projects()),
            dispatcher: EditDispatcher::new(config.editing.reopen),
            pending_delete: None,
            logger: StructuredLogger::from_config(&config.logging).for_section(PROJECTS_SECTION),
        }
    }

    pub fn viewer(&self) -> ViewerContext {
        self.viewer
    }

    pub fn resource_key(&self) -> ResourceKey {
        self.query.key()
    }

    pub fn query(&self) -> &SectionQuery<Vec<Project>> {
        &self.query
    }

    pub fn dispatcher(&self) -> &EditDispatcher<Project> {
        &self.dispatcher
    }

    /// Loaded projects in server order. Empty while pending or after a
    /// failed first fetch.
    pub fn projects(&self) -> &[Project] {
        self.query.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, id: &ProjectId) -> Option<&Project> {
        self.projects().iter().find(|p| &p.id == id)
    }

    /// Project awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<&ProjectId> {
        self.pending_delete.as_ref()
    }

    /// Switch viewer. The key does not depend on role, so no refetch is
    /// needed; open dialogs are dropped when admin is lost.
    pub fn set_viewer(&mut self, viewer: ViewerContext) {
        self.viewer = viewer;
        if viewer.is_admin() {
            return;
        }
        if self.dispatcher.is_open() || self.pending_delete.is_some() {
            self.dispatcher.reset();
            self.pending_delete = None;
            self.logger.info("dialogs closed: viewer is no longer admin");
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.query.begin()
    }

    pub fn settle(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Project>, CacheError>,
    ) -> SettleOutcome {
        match &result {
            Ok(projects) => self
                .logger
                .debug_builder("projects settled")
                .key(ticket.key())
                .field_u64("count", projects.len() as u64)
                .emit(),
            Err(e) => self
                .logger
                .warn_builder("projects fetch failed")
                .key(ticket.key())
                .field_display("error", e)
                .emit(),
        }

        let outcome = self.query.settle(ticket, result);
        if outcome != SettleOutcome::Applied {
            self.logger
                .debug_builder("fetch result dropped")
                .key(ticket.key())
                .field("outcome", format!("{:?}", outcome))
                .emit();
        }
        outcome
    }

    /// Fetch through the cache and settle.
    pub async fn load(&mut self, cache: &ResourceCache) -> SettleOutcome {
        let ticket = self.begin_fetch();
        let result = cache.get::<Vec<Project>>(ticket.key()).await;
        self.settle(ticket, result)
    }

    pub fn needs_load(&self) -> bool {
        self.query.needs_load()
    }

    fn shows_controls(&self) -> bool {
        self.viewer.is_admin() && !self.query.is_pending()
    }

    /// Controls in the section header.
    pub fn header_controls(&self) -> Vec<Control> {
        if !self.shows_controls() {
            return Vec::new();
        }
        vec![Control::AddProject]
    }

    /// Overlay controls for one card.
    pub fn card_controls(&self, id: &ProjectId) -> Vec<Control> {
        if !self.shows_controls() || self.find(id).is_none() {
            return Vec::new();
        }
        vec![
            Control::EditProject(id.clone()),
            Control::DeleteProject(id.clone()),
        ]
    }

    /// Buttons of the delete confirmation. Empty when none is pending.
    pub fn confirm_controls(&self) -> Vec<Control> {
        match &self.pending_delete {
            Some(id) if self.shows_controls() => {
                vec![Control::CancelDelete, Control::ConfirmDelete(id.clone())]
            }
            _ => Vec::new(),
        }
    }

    /// Every control currently rendered, in document order.
    pub fn controls(&self) -> Vec<Control> {
        let mut controls = self.header_controls();
        for project in self.projects() {
            controls.extend(self.card_controls(&project.id));
        }
        controls.extend(self.confirm_controls());
        controls
    }

    /// Handle a click on one of `controls()`. Rejections are logged.
    pub fn activate(&mut self, control: Control) -> Result<ControlOutcome, SectionError> {
        let result = match &control {
            Control::AddProject => self.add_project().map(ControlOutcome::Modal),
            Control::EditProject(id) => self.edit_project(id).map(ControlOutcome::Modal),
            Control::DeleteProject(id) => self
                .request_delete(id)
                .map(|()| ControlOutcome::DeleteRequested(id.clone())),
            Control::CancelDelete => self.cancel_delete().map(ControlOutcome::DeleteCancelled),
            Control::ConfirmDelete(id) => match self.begin_delete() {
                Ok(pending) if &pending == id => Ok(ControlOutcome::PersistDelete(pending)),
                Ok(_) => Err(SectionError::NoPendingDelete),
                Err(e) => Err(e),
            },
            Control::EditPhoto | Control::EditProfile => {
                Err(SectionError::ControlUnavailable(control.action()))
            }
        };

        if let Err(e) = &result {
            self.logger
                .warn_builder("control rejected")
                .field("control", control.action())
                .field_display("error", e)
                .emit();
        }
        result
    }

    fn ensure_editable(&self) -> Result<(), SectionError> {
        if !self.viewer.is_admin() {
            return Err(SectionError::NotAdmin);
        }
        if self.query.is_pending() {
            return Err(SectionError::Loading);
        }
        Ok(())
    }

    /// "Add New Project": opens the modal in create mode.
    pub fn add_project(&mut self) -> Result<Activation, SectionError> {
        self.ensure_editable()?;
        if self.pending_delete.is_some() {
            return Err(SectionError::DialogOpen);
        }
        let activation = self.dispatcher.activate(None);
        self.log_activation(&activation, None);
        Ok(activation)
    }

    /// Card "Edit": opens the modal targeting that project.
    pub fn edit_project(&mut self, id: &ProjectId) -> Result<Activation, SectionError> {
        self.ensure_editable()?;
        if self.pending_delete.is_some() {
            return Err(SectionError::DialogOpen);
        }
        let project = self
            .find(id)
            .cloned()
            .ok_or_else(|| SectionError::UnknownProject(id.clone()))?;

        let activation = self.dispatcher.activate(Some(project));
        self.log_activation(&activation, Some(id));
        Ok(activation)
    }

    fn log_activation(&self, activation: &Activation, id: Option<&ProjectId>) {
        let builder = match activation {
            Activation::Ignored => self.logger.debug_builder("activation ignored, modal already open"),
            _ => self.logger.info_builder("modal opened"),
        };
        match id {
            Some(id) => builder.field("project_id", id.as_str()).emit(),
            None => builder.field_bool("create", true).emit(),
        }
    }

    /// Card "Delete": asks for confirmation. Nothing is removed or persisted.
    pub fn request_delete(&mut self, id: &ProjectId) -> Result<(), SectionError> {
        self.ensure_editable()?;
        if self.dispatcher.is_open() {
            return Err(SectionError::DialogOpen);
        }
        match &self.pending_delete {
            Some(pending) if pending == id => return Ok(()),
            Some(_) => return Err(SectionError::DialogOpen),
            None => {}
        }
        if self.find(id).is_none() {
            return Err(SectionError::UnknownProject(id.clone()));
        }

        self.pending_delete = Some(id.clone());
        self.logger
            .info_builder("delete requested")
            .field("project_id", id.as_str())
            .emit();
        Ok(())
    }

    /// Dismiss the confirmation.
    pub fn cancel_delete(&mut self) -> Result<ProjectId, SectionError> {
        let id = self.pending_delete.take().ok_or(SectionError::NoPendingDelete)?;
        self.logger
            .info_builder("delete cancelled")
            .field("project_id", id.as_str())
            .emit();
        Ok(id)
    }

    /// Id to persist for a confirmed delete.
    pub fn begin_delete(&self) -> Result<ProjectId, SectionError> {
        if !self.viewer.is_admin() {
            return Err(SectionError::NotAdmin);
        }
        self.pending_delete.clone().ok_or(SectionError::NoPendingDelete)
    }

    /// Apply the persistence result for `id`. On success the project is
    /// removed from the rendered list and `projects` is invalidated; on
    /// failure the confirmation stays open.
    pub fn finish_delete(
        &mut self,
        id: ProjectId,
        result: Result<(), FetchError>,
        cache: &ResourceCache,
    ) -> Result<ProjectId, SectionError> {
        if let Err(e) = result {
            self.logger
                .warn_builder("delete failed")
                .field("project_id", id.as_str())
                .field_display("error", &e)
                .emit();
            return Err(SectionError::Persistence(e));
        }

        if self.pending_delete.as_ref() == Some(&id) {
            self.pending_delete = None;
        }
        if let Some(projects) = self.query.data_mut() {
            projects.retain(|p| p.id != id);
        }
        cache.invalidate(self.query.key());
        self.query.mark_stale();

        self.logger
            .info_builder("delete confirmed")
            .key(self.query.key())
            .field("project_id", id.as_str())
            .emit();
        Ok(id)
    }

    /// Persist the pending delete through `store`.
    pub async fn confirm_delete(
        &mut self,
        store: &dyn ProjectStore,
        cache: &ResourceCache,
    ) -> Result<ProjectId, SectionError> {
        let id = self.begin_delete()?;
        let result = store.delete_project(&id).await;
        self.finish_delete(id, result, cache)
    }

    /// Apply the modal's close signal. After a save the list is marked
    /// stale so the next load observes the edit.
    pub fn on_modal_closed(&mut self, signal: ModalClosed) -> Option<ModalOutcome> {
        let outcome = self.dispatcher.close(signal)?;
        if outcome == ModalOutcome::Saved {
            self.query.mark_stale();
        }
        self.logger
            .info_builder("modal closed")
            .field("outcome", format!("{:?}", outcome))
            .emit();
        Some(outcome)
    }

    pub fn unmount(&mut self) {
        self.query.unmount();
        self.dispatcher.reset();
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use folio_core::{ApiConfig, ReopenPolicy};
    use folio_data::{MemoryTransport, PortfolioApi};
    use futures::executor::block_on;

    fn sample() -> Vec<Project> {
        let mut alpha = Project::new("1", "Alpha");
        alpha.description = "First".to_string();
        alpha.technologies = vec!["Rust".to_string(), "Leptos".to_string()];
        alpha.project_url = "https://alpha.dev".to_string();
        alpha.github_url = "https://github.com/x/alpha".to_string();
        vec![alpha, Project::new("2", "Beta")]
    }

    fn loaded(viewer: ViewerContext, projects: Vec<Project>) -> ProjectsSection {
        let mut section = ProjectsSection::new(viewer, &PortfolioConfig::default());
        let ticket = section.begin_fetch();
        section.settle(ticket, Ok(projects));
        section
    }

    fn cache() -> ResourceCache {
        let transport = Arc::new(MemoryTransport::new());
        ResourceCache::new(PortfolioApi::new(transport, ApiConfig::default()))
    }

    #[derive(Default)]
    struct RecordingStore {
        deleted: Mutex<Vec<ProjectId>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl ProjectStore for RecordingStore {
        async fn delete_project(&self, id: &ProjectId) -> Result<(), FetchError> {
            if let Some(status) = self.fail_with {
                return Err(FetchError::Http {
                    status,
                    url: format!("/api/projects/{}", id),
                });
            }
            self.deleted.lock().unwrap().push(id.clone());
            Ok(())
        }
    }

    // === Listing Tests ===

    #[test]
    fn test_pending_lists_nothing() {
        let section = ProjectsSection::new(ViewerContext::admin(), &PortfolioConfig::default());

        assert!(section.query().is_pending());
        assert!(section.projects().is_empty());
        assert!(section.controls().is_empty());
    }

    #[test]
    fn test_projects_keep_server_order() {
        let section = loaded(ViewerContext::visitor(), sample());
        let titles: Vec<_> = section.projects().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_duplicate_tags_kept() {
        let mut project = Project::new("1", "Alpha");
        project.technologies = vec!["Rust".to_string(), "Rust".to_string()];
        let section = loaded(ViewerContext::visitor(), vec![project]);
        assert_eq!(section.projects()[0].technologies.len(), 2);
    }

    #[test]
    fn test_empty_list_for_admin_still_offers_add() {
        let section = loaded(ViewerContext::admin(), Vec::new());
        assert_eq!(section.controls(), vec![Control::AddProject]);
    }

    #[test]
    fn test_failed_first_fetch_lists_nothing() {
        let mut section = ProjectsSection::new(ViewerContext::visitor(), &PortfolioConfig::default());
        let ticket = section.begin_fetch();
        let err = CacheError::Fetch(Arc::new(FetchError::Http {
            status: 500,
            url: "/api/projects".to_string(),
        }));
        section.settle(ticket, Err(err));

        assert!(!section.query().is_pending());
        assert!(section.projects().is_empty());
    }

    // === Admin Gating Tests ===

    #[test]
    fn test_visitor_controls_absent() {
        let mut section = loaded(ViewerContext::admin(), sample());
        section.request_delete(&ProjectId::from("1")).unwrap();
        section.set_viewer(ViewerContext::visitor());

        assert!(section.controls().is_empty());
        assert!(section.header_controls().is_empty());
        assert!(section.card_controls(&ProjectId::from("1")).is_empty());
        assert!(section.confirm_controls().is_empty());
    }

    #[test]
    fn test_admin_controls_per_card() {
        let section = loaded(ViewerContext::admin(), sample());
        let id = ProjectId::from("2");

        assert_eq!(section.header_controls(), vec![Control::AddProject]);
        assert_eq!(
            section.card_controls(&id),
            vec![Control::EditProject(id.clone()), Control::DeleteProject(id)]
        );
        assert!(section.card_controls(&ProjectId::from("9")).is_empty());
        assert_eq!(section.controls().len(), 5);
    }

    #[test]
    fn test_visitor_actions_rejected() {
        let mut section = loaded(ViewerContext::visitor(), sample());
        assert!(matches!(section.add_project(), Err(SectionError::NotAdmin)));
        assert!(matches!(
            section.activate(Control::DeleteProject(ProjectId::from("1"))),
            Err(SectionError::NotAdmin)
        ));
        assert!(section.pending_delete().is_none());
    }

    #[test]
    fn test_profile_control_rejected() {
        let mut section = loaded(ViewerContext::admin(), sample());
        assert!(matches!(
            section.activate(Control::EditProfile),
            Err(SectionError::ControlUnavailable("edit-profile"))
        ));
    }

    // === Edit Modal Tests ===

    #[test]
    fn test_add_opens_create_modal() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let outcome = section.activate(Control::AddProject).unwrap();

        assert!(matches!(outcome, ControlOutcome::Modal(Activation::Opened(_))));
        assert!(section.dispatcher().is_open());
        assert!(section.dispatcher().target().is_none());
    }

    #[test]
    fn test_edit_targets_project() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let closer = section
            .edit_project(&ProjectId::from("2"))
            .unwrap()
            .into_closer()
            .unwrap();

        assert_eq!(section.dispatcher().target().map(|p| p.title.as_str()), Some("Beta"));

        section.on_modal_closed(closer.close(ModalOutcome::Saved));
        assert!(!section.dispatcher().is_open());
        assert!(section.needs_load());
    }

    #[test]
    fn test_edit_unknown_project() {
        let mut section = loaded(ViewerContext::admin(), sample());
        assert!(matches!(
            section.edit_project(&ProjectId::from("9")),
            Err(SectionError::UnknownProject(_))
        ));
    }

    #[test]
    fn test_second_activation_ignored_by_default() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let _closer = section.edit_project(&ProjectId::from("1")).unwrap();

        let session = section.dispatcher().session();

        assert_eq!(section.add_project().unwrap(), Activation::Ignored);
        assert_eq!(section.dispatcher().target().map(|p| p.title.as_str()), Some("Alpha"));
        assert_eq!(section.dispatcher().session(), session);
    }

    #[test]
    fn test_retarget_policy() {
        let mut config = PortfolioConfig::default();
        config.editing.reopen = ReopenPolicy::Retarget;
        let mut section = ProjectsSection::new(ViewerContext::admin(), &config);
        let ticket = section.begin_fetch();
        section.settle(ticket, Ok(sample()));

        let _first = section.edit_project(&ProjectId::from("1")).unwrap();
        let second = section.add_project().unwrap();
        assert!(matches!(second, Activation::Retargeted(_)));
        assert!(section.dispatcher().target().is_none());
    }

    // === Delete Tests ===

    #[test]
    fn test_request_delete_only_confirms() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let id = ProjectId::from("1");
        let outcome = section.activate(Control::DeleteProject(id.clone())).unwrap();

        assert_eq!(outcome, ControlOutcome::DeleteRequested(id.clone()));
        assert_eq!(section.projects().len(), 2);
        assert_eq!(section.pending_delete(), Some(&id));
        assert_eq!(
            section.confirm_controls(),
            vec![Control::CancelDelete, Control::ConfirmDelete(id)]
        );
    }

    #[test]
    fn test_cancel_delete_keeps_project() {
        let mut section = loaded(ViewerContext::admin(), sample());
        section.request_delete(&ProjectId::from("1")).unwrap();

        assert_eq!(section.cancel_delete().unwrap(), ProjectId::from("1"));
        assert!(section.pending_delete().is_none());
        assert_eq!(section.projects().len(), 2);
        assert!(matches!(section.cancel_delete(), Err(SectionError::NoPendingDelete)));
    }

    #[test]
    fn test_confirm_delete_persists_then_removes() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let store = RecordingStore::default();
        let cache = cache();

        section.request_delete(&ProjectId::from("1")).unwrap();
        let deleted = block_on(section.confirm_delete(&store, &cache)).unwrap();

        assert_eq!(deleted, ProjectId::from("1"));
        assert_eq!(*store.deleted.lock().unwrap(), vec![ProjectId::from("1")]);
        assert_eq!(section.projects().len(), 1);
        assert!(section.find(&ProjectId::from("1")).is_none());
        assert!(section.pending_delete().is_none());
        assert!(section.needs_load());
    }

    #[test]
    fn test_confirm_delete_failure_keeps_project() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let store = RecordingStore {
            fail_with: Some(500),
            ..RecordingStore::default()
        };

        section.request_delete(&ProjectId::from("2")).unwrap();
        let result = block_on(section.confirm_delete(&store, &cache()));

        assert!(matches!(result, Err(SectionError::Persistence(_))));
        assert_eq!(section.projects().len(), 2);
        assert_eq!(section.pending_delete(), Some(&ProjectId::from("2")));
    }

    #[test]
    fn test_confirm_without_request() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let store = RecordingStore::default();
        let result = block_on(section.confirm_delete(&store, &cache()));

        assert!(matches!(result, Err(SectionError::NoPendingDelete)));
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_control_hands_back_pending_id() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let id = ProjectId::from("2");
        section.activate(Control::DeleteProject(id.clone())).unwrap();

        let outcome = section.activate(Control::ConfirmDelete(id.clone())).unwrap();
        assert_eq!(outcome, ControlOutcome::PersistDelete(id.clone()));
        // Persisting is the caller's job; nothing is removed yet.
        assert_eq!(section.projects().len(), 2);

        section.finish_delete(id, Ok(()), &cache()).unwrap();
        assert_eq!(section.projects().len(), 1);
        assert!(section.confirm_controls().is_empty());
    }

    #[test]
    fn test_confirm_control_for_other_project_rejected() {
        let mut section = loaded(ViewerContext::admin(), sample());
        section.request_delete(&ProjectId::from("1")).unwrap();

        assert!(matches!(
            section.activate(Control::ConfirmDelete(ProjectId::from("2"))),
            Err(SectionError::NoPendingDelete)
        ));
        assert_eq!(section.pending_delete(), Some(&ProjectId::from("1")));
    }

    #[test]
    fn test_cancel_control_without_pending_delete() {
        let mut section = loaded(ViewerContext::admin(), sample());
        assert!(matches!(
            section.activate(Control::CancelDelete),
            Err(SectionError::NoPendingDelete)
        ));

        section.request_delete(&ProjectId::from("1")).unwrap();
        assert_eq!(
            section.activate(Control::CancelDelete).unwrap(),
            ControlOutcome::DeleteCancelled(ProjectId::from("1"))
        );
    }

    #[test]
    fn test_delete_control_while_modal_open_rejected() {
        let mut section = loaded(ViewerContext::admin(), sample());
        let _closer = section.activate(Control::EditProject(ProjectId::from("1"))).unwrap();

        assert!(matches!(
            section.activate(Control::DeleteProject(ProjectId::from("2"))),
            Err(SectionError::DialogOpen)
        ));
        assert!(section.pending_delete().is_none());
    }

    #[test]
    fn test_edit_and_delete_are_exclusive() {
        let mut section = loaded(ViewerContext::admin(), sample());
        section.request_delete(&ProjectId::from("1")).unwrap();
        assert!(matches!(section.add_project(), Err(SectionError::DialogOpen)));
        section.cancel_delete().unwrap();

        let _closer = section.edit_project(&ProjectId::from("1")).unwrap();
        assert!(matches!(
            section.request_delete(&ProjectId::from("2")),
            Err(SectionError::DialogOpen)
        ));
    }

    #[test]
    fn test_losing_admin_drops_confirmation() {
        let mut section = loaded(ViewerContext::admin(), sample());
        section.request_delete(&ProjectId::from("1")).unwrap();

        section.set_viewer(ViewerContext::visitor());

        assert!(section.pending_delete().is_none());
        assert_eq!(section.resource_key(), ResourceKey::Projects);
        assert!(section.confirm_controls().is_empty());
    }
}
