//! Profile section.

use folio_cache::{CacheError, ResourceCache};
use folio_core::{PortfolioConfig, ProfileDefaults, ResourceKey, ViewerContext};
use folio_data::Profile;
use folio_observability::StructuredLogger;

use crate::control::Control;
use crate::error::SectionError;
use crate::intent::{Activation, EditDispatcher};
use crate::modal::{ModalClosed, ModalOutcome};
use crate::query::{FetchTicket, SectionQuery, SettleOutcome};

/// Section name used in logs.
pub const PROFILE_SECTION: &str = "profile";

/// The profile header: photo, name, title and the profile edit workflow.
///
/// Admins read `profile/me`, everyone else `profile/public`.
#[derive(Debug, Clone)]
pub struct ProfileSection {
    viewer: ViewerContext,
    query: SectionQuery<Profile>,
    dispatcher: EditDispatcher<Profile>,
    defaults: ProfileDefaults,
    logger: StructuredLogger,
}

impl ProfileSection {
    pub fn new(viewer: ViewerContext, config: &PortfolioConfig) -> Self {
        Self {
            viewer,
            query: SectionQuery::new(ResourceKey::profile_for(viewer)),
            dispatcher: EditDispatcher::new(config.editing.reopen),
            defaults: config.profile.clone(),
            logger: StructuredLogger::from_config(&config.logging).for_section(PROFILE_SECTION),
        }
    }

    pub fn viewer(&self) -> ViewerContext {
        self.viewer
    }

    /// Cache key for the current viewer.
    pub fn resource_key(&self) -> ResourceKey {
        self.query.key()
    }

    pub fn query(&self) -> &SectionQuery<Profile> {
        &self.query
    }

    pub fn dispatcher(&self) -> &EditDispatcher<Profile> {
        &self.dispatcher
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.query.data()
    }

    /// Name to show, or the configured default.
    pub fn display_name(&self) -> &str {
        self.profile()
            .and_then(Profile::name)
            .unwrap_or(self.defaults.default_name.as_str())
    }

    /// Title to show, or the configured default tagline.
    pub fn display_title(&self) -> &str {
        self.profile()
            .and_then(Profile::title)
            .unwrap_or(self.defaults.default_title.as_str())
    }

    /// Photo URL, falling back to the configured placeholder. `None` when
    /// neither is set.
    pub fn display_image(&self) -> Option<&str> {
        self.profile()
            .and_then(Profile::image_url)
            .or_else(|| Some(self.defaults.placeholder_image_url.as_str()))
            .filter(|url| !url.trim().is_empty())
    }

    /// Switch viewer. Returns `true` when the cache key changed and a
    /// refetch is required; data for the old key is dropped.
    pub fn set_viewer(&mut self, viewer: ViewerContext) -> bool {
        self.viewer = viewer;
        if !viewer.is_admin() && self.dispatcher.is_open() {
            self.dispatcher.reset();
            self.logger.info("modal closed: viewer is no longer admin");
        }

        let changed = self.query.rebind(ResourceKey::profile_for(viewer));
        if changed {
            self.logger
                .debug_builder("viewer changed, refetch required")
                .key(self.query.key())
                .field_display("role", &viewer.role())
                .emit();
        }
        changed
    }

    /// Start a fetch for the current key.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.query.begin()
    }

    /// Apply a fetch result.
    pub fn settle(&mut self, ticket: FetchTicket, result: Result<Profile, CacheError>) -> SettleOutcome {
        if let Err(e) = &result {
            self.logger
                .warn_builder("profile fetch failed, rendering defaults")
                .key(ticket.key())
                .field_display("error", e)
                .emit();
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
        let result = cache.get::<Profile>(ticket.key()).await;
        self.settle(ticket, result)
    }

    /// Controls to render: photo overlay, then the heading button. Empty
    /// for visitors and while loading.
    pub fn controls(&self) -> Vec<Control> {
        if !self.viewer.is_admin() || self.query.is_pending() {
            return Vec::new();
        }
        vec![Control::EditPhoto, Control::EditProfile]
    }

    /// "Edit Profile" button.
    pub fn edit_profile(&mut self) -> Result<Activation, SectionError> {
        self.activate(Control::EditProfile)
    }

    /// Photo overlay. Opens the same modal as `edit_profile`.
    pub fn edit_photo(&mut self) -> Result<Activation, SectionError> {
        self.activate(Control::EditPhoto)
    }

    /// Handle a click on one of `controls()`. Rejections are logged.
    pub fn activate(&mut self, control: Control) -> Result<Activation, SectionError> {
        let activation = match self.open_editor(&control) {
            Ok(activation) => activation,
            Err(e) => {
                self.logger
                    .warn_builder("control rejected")
                    .field("control", control.action())
                    .field_display("error", &e)
                    .emit();
                return Err(e);
            }
        };

        match &activation {
            Activation::Ignored => self
                .logger
                .debug_builder("activation ignored, modal already open")
                .field("control", control.action())
                .emit(),
            _ => self
                .logger
                .info_builder("modal opened")
                .field("control", control.action())
                .emit(),
        }
        Ok(activation)
    }

    fn open_editor(&mut self, control: &Control) -> Result<Activation, SectionError> {
        if !self.viewer.is_admin() {
            return Err(SectionError::NotAdmin);
        }
        if !matches!(control, Control::EditPhoto | Control::EditProfile) {
            return Err(SectionError::ControlUnavailable(control.action()));
        }
        if self.query.is_pending() {
            return Err(SectionError::Loading);
        }
        Ok(self.dispatcher.activate(self.profile().cloned()))
    }

    /// Apply the modal's close signal. After a save the profile is marked
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

    /// Whether a load should be started now.
    pub fn needs_load(&self) -> bool {
        self.query.needs_load()
    }

    /// Stop accepting fetch results and drop any open modal.
    pub fn unmount(&mut self) {
        self.query.unmount();
        self.dispatcher.reset();
    }
}
