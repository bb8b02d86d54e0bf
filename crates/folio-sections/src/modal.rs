//! Contract between sections and the external edit modals.

/// How the modal finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    /// The edit or create was persisted. The modal is responsible for
    /// invalidating the affected cache keys before closing.
    Saved,
    /// The user dismissed the modal.
    Cancelled,
}

/// One-shot close capability handed to a modal when it opens.
///
/// Not `Clone`: closing consumes it, so a modal can signal at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the modal must eventually close through this handle"]
pub struct ModalCloser {
    session: u64,
}

impl ModalCloser {
    pub(crate) fn new(session: u64) -> Self {
        Self { session }
    }

    /// Session this handle belongs to.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Signal completion. Pass the result to the owning section.
    pub fn close(self, outcome: ModalOutcome) -> ModalClosed {
        ModalClosed {
            session: self.session,
            outcome,
        }
    }
}

/// Close signal produced by `ModalCloser::close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalClosed {
    session: u64,
    outcome: ModalOutcome,
}

impl ModalClosed {
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn outcome(&self) -> ModalOutcome {
        self.outcome
    }
}
