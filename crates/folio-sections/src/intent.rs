//! Edit intent state machine.

use folio_core::ReopenPolicy;

use crate::modal::{ModalCloser, ModalClosed, ModalOutcome};

/// Which modal, if any, a section has open.
///
/// A single sum type: a target can only exist while the modal is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent<T> {
    /// No modal rendered.
    Closed,
    /// Modal rendered with `target` bound; `None` means create-new.
    Open { target: Option<T>, session: u64 },
}

impl<T> EditIntent<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Result of activating an edit affordance.
#[derive(Debug, PartialEq, Eq)]
pub enum Activation {
    /// The dispatcher moved from `Closed` to `Open`.
    Opened(ModalCloser),
    /// The open modal was given a new target under a new session.
    Retargeted(ModalCloser),
    /// A modal was already open and the policy is `Ignore`.
    Ignored,
}

impl Activation {
    /// The close handle, if a modal (re)opened.
    pub fn into_closer(self) -> Option<ModalCloser> {
        match self {
            Self::Opened(closer) | Self::Retargeted(closer) => Some(closer),
            Self::Ignored => None,
        }
    }
}

/// Per-section dispatcher tracking `Closed | Open(target)`.
#[derive(Debug, Clone)]
pub struct EditDispatcher<T> {
    intent: EditIntent<T>,
    policy: ReopenPolicy,
    last_session: u64,
}

impl<T> Default for EditDispatcher<T> {
    fn default() -> Self {
        Self::new(ReopenPolicy::default())
    }
}

impl<T> EditDispatcher<T> {
    pub fn new(policy: ReopenPolicy) -> Self {
        Self {
            intent: EditIntent::Closed,
            policy,
            last_session: 0,
        }
    }

    pub fn intent(&self) -> &EditIntent<T> {
        &self.intent
    }

    pub fn policy(&self) -> ReopenPolicy {
        self.policy
    }

    pub fn is_open(&self) -> bool {
        self.intent.is_open()
    }

    /// Bound target while open. `None` when closed or in create mode.
    pub fn target(&self) -> Option<&T> {
        match &self.intent {
            EditIntent::Open { target, .. } => target.as_ref(),
            EditIntent::Closed => None,
        }
    }

    /// Session of the open modal.
    pub fn session(&self) -> Option<u64> {
        match &self.intent {
            EditIntent::Open { session, .. } => Some(*session),
            EditIntent::Closed => None,
        }
    }

    /// Open a modal for `target` (`None` for create-new).
    pub fn activate(&mut self, target: Option<T>) -> Activation {
        let retarget = match (&self.intent, self.policy) {
            (EditIntent::Closed, _) => false,
            (EditIntent::Open { .. }, ReopenPolicy::Ignore) => return Activation::Ignored,
            (EditIntent::Open { .. }, ReopenPolicy::Retarget) => true,
        };

        self.last_session += 1;
        self.intent = EditIntent::Open {
            target,
            session: self.last_session,
        };

        let closer = ModalCloser::new(self.last_session);
        if retarget {
            Activation::Retargeted(closer)
        } else {
            Activation::Opened(closer)
        }
    }

    /// Apply a close signal. Returns the outcome if it closed the current
    /// session; signals from superseded sessions are ignored.
    pub fn close(&mut self, signal: ModalClosed) -> Option<ModalOutcome> {
        if self.session() != Some(signal.session()) {
            return None;
        }
        self.intent = EditIntent::Closed;
        Some(signal.outcome())
    }

    /// Force `Closed`, invalidating any outstanding close handle.
    pub fn reset(&mut self) {
        self.intent = EditIntent::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened<T>(dispatcher: &mut EditDispatcher<T>, target: Option<T>) -> ModalCloser {
        match dispatcher.activate(target) {
            Activation::Opened(closer) => closer,
            other => panic!("expected Opened, got {:?}", other),
        }
    }

    // === Transition Tests ===

    #[test]
    fn test_initially_closed() {
        let dispatcher = EditDispatcher::<String>::default();
        assert_eq!(dispatcher.intent(), &EditIntent::Closed);
        assert!(dispatcher.target().is_none());
        assert!(dispatcher.session().is_none());
    }

    #[test]
    fn test_activate_entity() {
        let mut dispatcher = EditDispatcher::default();
        let closer = opened(&mut dispatcher, Some("project-1"));

        assert!(dispatcher.is_open());
        assert_eq!(dispatcher.target(), Some(&"project-1"));
        assert_eq!(dispatcher.session(), Some(closer.session()));
    }

    #[test]
    fn test_activate_create_new() {
        let mut dispatcher = EditDispatcher::<&str>::default();
        let _closer = opened(&mut dispatcher, None);

        assert_eq!(
            dispatcher.intent(),
            &EditIntent::Open {
                target: None,
                session: 1
            }
        );
    }

    #[test]
    fn test_close_returns_to_closed() {
        let mut dispatcher = EditDispatcher::default();
        let closer = opened(&mut dispatcher, Some(1));

        let outcome = dispatcher.close(closer.close(ModalOutcome::Cancelled));

        assert_eq!(outcome, Some(ModalOutcome::Cancelled));
        assert_eq!(dispatcher.intent(), &EditIntent::Closed);
        assert!(dispatcher.target().is_none());
    }

    #[test]
    fn test_reopen_after_close_uses_new_session() {
        let mut dispatcher = EditDispatcher::default();
        let first = opened(&mut dispatcher, Some(1));
        let first_session = first.session();
        dispatcher.close(first.close(ModalOutcome::Saved));

        let second = opened(&mut dispatcher, Some(2));
        assert_ne!(second.session(), first_session);
    }

    // === Reopen Policy Tests ===

    #[test]
    fn test_ignore_policy_keeps_first_target() {
        let mut dispatcher = EditDispatcher::new(ReopenPolicy::Ignore);
        let _closer = opened(&mut dispatcher, Some("a"));

        assert_eq!(dispatcher.activate(Some("b")), Activation::Ignored);
        assert_eq!(dispatcher.target(), Some(&"a"));
    }

    #[test]
    fn test_retarget_policy_replaces_target() {
        let mut dispatcher = EditDispatcher::new(ReopenPolicy::Retarget);
        let old = opened(&mut dispatcher, Some("a"));

        let new = dispatcher.activate(Some("b")).into_closer().unwrap();
        assert_eq!(dispatcher.target(), Some(&"b"));

        // The superseded handle no longer closes anything.
        assert_eq!(dispatcher.close(old.close(ModalOutcome::Cancelled)), None);
        assert!(dispatcher.is_open());

        assert_eq!(
            dispatcher.close(new.close(ModalOutcome::Saved)),
            Some(ModalOutcome::Saved)
        );
        assert!(!dispatcher.is_open());
    }

    #[test]
    fn test_reset_invalidates_handle() {
        let mut dispatcher = EditDispatcher::default();
        let closer = opened(&mut dispatcher, Some(1));

        dispatcher.reset();
        assert!(!dispatcher.is_open());
        assert_eq!(dispatcher.close(closer.close(ModalOutcome::Saved)), None);
    }

    #[test]
    fn test_stale_signal_does_not_close_later_session() {
        let mut dispatcher = EditDispatcher::default();
        let first = opened(&mut dispatcher, Some(1));
        dispatcher.reset();
        let _second = opened(&mut dispatcher, Some(2));

        assert_eq!(dispatcher.close(first.close(ModalOutcome::Cancelled)), None);
        assert_eq!(dispatcher.target(), Some(&2));
    }
}
