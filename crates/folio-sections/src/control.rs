//! Edit affordances and what activating one produced.

use folio_data::ProjectId;

use crate::intent::Activation;

/// An edit affordance. Sections list only the ones the viewer may use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    /// Overlay on the profile photo.
    EditPhoto,
    /// "Edit Profile" button under the name.
    EditProfile,
    /// "Add New Project" button in the projects header.
    AddProject,
    /// Edit button on a project card overlay.
    EditProject(ProjectId),
    /// Delete button on a project card overlay.
    DeleteProject(ProjectId),
    /// Confirm button in the delete confirmation.
    ConfirmDelete(ProjectId),
    /// Cancel button in the delete confirmation.
    CancelDelete,
}

impl Control {
    /// Stable identifier, used for `data-action` and log fields.
    pub fn action(&self) -> &'static str {
        match self {
            Self::EditPhoto => "edit-photo",
            Self::EditProfile => "edit-profile",
            Self::AddProject => "add-project",
            Self::EditProject(_) => "edit-project",
            Self::DeleteProject(_) => "delete-project",
            Self::ConfirmDelete(_) => "confirm-delete",
            Self::CancelDelete => "cancel-delete",
        }
    }

    /// Visible label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EditPhoto => "Change photo",
            Self::EditProfile => "Edit Profile",
            Self::AddProject => "Add New Project",
            Self::EditProject(_) => "Edit",
            Self::DeleteProject(_) => "Delete",
            Self::ConfirmDelete(_) => "Delete project",
            Self::CancelDelete => "Cancel",
        }
    }
}

/// Result of activating a projects control.
#[derive(Debug, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Add or edit went to the dispatcher.
    Modal(Activation),
    /// The confirmation is showing for this project.
    DeleteRequested(ProjectId),
    /// The confirmation was dismissed.
    DeleteCancelled(ProjectId),
    /// Confirmed. Persist the delete, then report back with
    /// `ProjectsSection::finish_delete`.
    PersistDelete(ProjectId),
}
