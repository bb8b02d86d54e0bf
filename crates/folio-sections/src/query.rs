//! Fetch state of one section.

use folio_cache::CacheError;
use folio_core::ResourceKey;

/// Two-phase fetch state. A swallowed failure settles with no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Pending,
    Settled(Option<T>),
}

/// Identifies one fetch started by `SectionQuery::begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    key: ResourceKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> ResourceKey {
        self.key
    }
}

/// What happened to a fetch result handed to `settle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The result is now the section's state.
    Applied,
    /// A newer fetch (or a key change) superseded it; dropped.
    Superseded,
    /// The section was unmounted; dropped.
    Unmounted,
}

/// Fetch bookkeeping for a section bound to one cache key at a time.
#[derive(Debug, Clone)]
pub struct SectionQuery<T> {
    key: ResourceKey,
    phase: Phase<T>,
    generation: u64,
    stale: bool,
    mounted: bool,
    last_failure: Option<String>,
}

impl<T> SectionQuery<T> {
    /// A mounted, pending query for `key`.
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            phase: Phase::Pending,
            generation: 0,
            stale: false,
            mounted: true,
            last_failure: None,
        }
    }

    pub fn key(&self) -> ResourceKey {
        self.key
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Settled data, if any.
    pub fn data(&self) -> Option<&T> {
        match &self.phase {
            Phase::Settled(data) => data.as_ref(),
            Phase::Pending => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.phase {
            Phase::Settled(data) => data.as_mut(),
            Phase::Pending => None,
        }
    }

    /// Text of the most recent swallowed failure. Not rendered.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Whether a fetch should be started.
    pub fn needs_load(&self) -> bool {
        self.mounted && (self.is_pending() || self.stale)
    }

    /// Point the query at a new key. Drops data from the old key and
    /// supersedes any outstanding fetch. Returns whether the key changed.
    pub fn rebind(&mut self, key: ResourceKey) -> bool {
        if key == self.key {
            return false;
        }
        self.key = key;
        self.generation += 1;
        self.phase = Phase::Pending;
        self.stale = false;
        self.last_failure = None;
        true
    }

    /// Mark loaded data out of date. It stays visible until the refetch
    /// settles.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Start a fetch for the current key, superseding older ones.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            key: self.key,
            generation: self.generation,
        }
    }

    /// Apply a fetch result if it is still the latest for this query.
    ///
    /// A failure settles with no data, except that data already shown is
    /// kept when a refetch fails.
    pub fn settle(&mut self, ticket: FetchTicket, result: Result<T, CacheError>) -> SettleOutcome {
        if !self.mounted {
            return SettleOutcome::Unmounted;
        }
        if ticket.key != self.key || ticket.generation != self.generation {
            return SettleOutcome::Superseded;
        }

        self.stale = false;
        match result {
            Ok(data) => {
                self.phase = Phase::Settled(Some(data));
                self.last_failure = None;
            }
            Err(e) => {
                self.last_failure = Some(e.to_string());
                if self.is_pending() {
                    self.phase = Phase::Settled(None);
                }
            }
        }
        SettleOutcome::Applied
    }

    /// Stop accepting results.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use folio_data::FetchError;

    fn failure(status: u16) -> CacheError {
        CacheError::Fetch(Arc::new(FetchError::Http {
            status,
            url: "/api/projects".to_string(),
        }))
    }

    #[test]
    fn test_starts_pending() {
        let query = SectionQuery::<u32>::new(ResourceKey::Projects);
        assert!(query.is_pending());
        assert!(query.needs_load());
        assert!(query.data().is_none());
    }

    #[test]
    fn test_settle_success() {
        let mut query = SectionQuery::new(ResourceKey::Projects);
        let ticket = query.begin();

        assert_eq!(query.settle(ticket, Ok(3)), SettleOutcome::Applied);
        assert_eq!(query.phase(), &Phase::Settled(Some(3)));
        assert!(!query.needs_load());
    }

    #[test]
    fn test_failure_settles_without_data() {
        let mut query = SectionQuery::<u32>::new(ResourceKey::Projects);
        let ticket = query.begin();

        query.settle(ticket, Err(failure(500)));

        assert_eq!(query.phase(), &Phase::Settled(None));
        assert!(query.last_failure().unwrap().contains("500"));
        assert!(!query.needs_load());
    }

    #[test]
    fn test_failed_refetch_keeps_shown_data() {
        let mut query = SectionQuery::new(ResourceKey::Projects);
        let ticket = query.begin();
        query.settle(ticket, Ok(1));

        query.mark_stale();
        assert!(query.needs_load());
        assert_eq!(query.data(), Some(&1));

        let ticket = query.begin();
        query.settle(ticket, Err(failure(503)));
        assert_eq!(query.data(), Some(&1));
        assert!(query.last_failure().is_some());
    }

    #[test]
    fn test_older_ticket_is_superseded() {
        let mut query = SectionQuery::new(ResourceKey::Projects);
        let old = query.begin();
        let new = query.begin();

        assert_eq!(query.settle(old, Ok(1)), SettleOutcome::Superseded);
        assert!(query.is_pending());
        assert_eq!(query.settle(new, Ok(2)), SettleOutcome::Applied);
        assert_eq!(query.data(), Some(&2));
    }

    #[test]
    fn test_rebind_discards_old_key_results() {
        let mut query = SectionQuery::new(ResourceKey::MyProfile);
        let admin_ticket = query.begin();
        query.settle(admin_ticket, Ok("mine"));

        let in_flight = query.begin();
        assert!(query.rebind(ResourceKey::PublicProfile));
        assert!(query.is_pending());
        assert!(query.data().is_none());

        assert_eq!(query.settle(in_flight, Ok("late")), SettleOutcome::Superseded);
        assert_eq!(in_flight.key(), ResourceKey::MyProfile);

        let ticket = query.begin();
        assert_eq!(ticket.key(), ResourceKey::PublicProfile);
        query.settle(ticket, Ok("public"));
        assert_eq!(query.data(), Some(&"public"));
    }

    #[test]
    fn test_rebind_same_key_is_noop() {
        let mut query = SectionQuery::new(ResourceKey::Projects);
        let ticket = query.begin();
        query.settle(ticket, Ok(1));

        assert!(!query.rebind(ResourceKey::Projects));
        assert_eq!(query.data(), Some(&1));
    }

    #[test]
    fn test_unmounted_results_are_dropped() {
        let mut query = SectionQuery::new(ResourceKey::Projects);
        let ticket = query.begin();
        query.unmount();

        assert_eq!(query.settle(ticket, Ok(1)), SettleOutcome::Unmounted);
        assert!(query.is_pending());
        assert!(!query.needs_load());
    }
}
