//! Section operation errors.

use folio_data::{FetchError, ProjectId};

/// Errors returned when an affordance cannot be activated.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("edit controls are only available to admins")]
    NotAdmin,

    #[error("section has not finished loading")]
    Loading,

    #[error("another dialog is already open")]
    DialogOpen,

    #[error("unknown project `{0}`")]
    UnknownProject(ProjectId),

    #[error("control `{0}` does not belong to this section")]
    ControlUnavailable(&'static str),

    #[error("no delete is awaiting confirmation")]
    NoPendingDelete,

    #[error("failed to delete project: {0}")]
    Persistence(#[source] FetchError),
}
