//! Keyed resource cache with in-flight de-duplication.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use folio_core::ResourceKey;
use folio_data::{FetchError, Payload, PortfolioApi};
use folio_observability::StructuredLogger;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;

use crate::error::{CacheError, CacheResult};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>, Arc<FetchError>>>>;

/// How a load was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fresh entry, no request made.
    Hit,
    /// This caller started the request.
    Miss,
    /// Another caller's outstanding request was reused.
    Joined,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Joined => write!(f, "JOINED"),
        }
    }
}

/// Synchronous view of one cache key.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Last stored payload, if any.
    pub data: Option<Arc<Value>>,
    /// A request for this key is outstanding.
    pub is_loading: bool,
    /// The stored payload was invalidated and must be reloaded before use.
    pub is_stale: bool,
}

impl Snapshot {
    /// Whether the payload can be used without a request.
    pub fn is_fresh(&self) -> bool {
        self.data.is_some() && !self.is_stale
    }

    /// Decode and validate the payload.
    pub fn decode<T: Payload>(&self) -> Option<Result<T, FetchError>> {
        self.data.as_deref().map(T::from_json)
    }
}

struct InFlight {
    id: u64,
    generation: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    value: Option<Arc<Value>>,
    stale: bool,
    /// Bumped on every invalidation; responses from older generations are
    /// handed to their waiters but never stored.
    generation: u64,
    inflight: Option<InFlight>,
    /// Source of `InFlight::id`. Only the waiter holding the current id may
    /// clear the slot.
    next_request: u64,
}

/// Process-wide cache keyed by resource identity.
///
/// Cloning shares the same entries. There is no cross-key locking and no
/// multi-key consistency.
#[derive(Clone)]
pub struct ResourceCache {
    api: PortfolioApi,
    entries: Arc<Mutex<HashMap<ResourceKey, Entry>>>,
    logger: StructuredLogger,
}

impl ResourceCache {
    /// Create a cache reading through `api`.
    pub fn new(api: PortfolioApi) -> Self {
        Self {
            api,
            entries: Arc::new(Mutex::new(HashMap::new())),
            logger: StructuredLogger::new().for_section("cache"),
        }
    }

    /// Set the logger.
    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger.for_section("cache");
        self
    }

    /// Current state of `key`. Never starts a request.
    pub fn snapshot(&self, key: ResourceKey) -> Snapshot {
        let entries = self.lock();
        match entries.get(&key) {
            Some(entry) => Snapshot {
                data: entry.value.clone(),
                is_loading: entry.inflight.is_some(),
                is_stale: entry.stale,
            },
            None => Snapshot::default(),
        }
    }

    /// Return the payload for `key`, fetching it unless a fresh copy is
    /// stored. Concurrent callers for the same key share one request.
    pub async fn load(&self, key: ResourceKey) -> CacheResult<(Arc<Value>, CacheStatus)> {
        let (request, generation, future, status) = {
            let mut entries = self.lock();
            let entry = entries.entry(key).or_default();

            if let (Some(value), false) = (&entry.value, entry.stale) {
                return Ok((value.clone(), CacheStatus::Hit));
            }

            match &entry.inflight {
                Some(inflight) => (
                    inflight.id,
                    inflight.generation,
                    inflight.future.clone(),
                    CacheStatus::Joined,
                ),
                None => {
                    let api = self.api.clone();
                    let future = async move { api.read(key).await.map(Arc::new).map_err(Arc::new) }
                        .boxed()
                        .shared();
                    entry.next_request += 1;
                    entry.inflight = Some(InFlight {
                        id: entry.next_request,
                        generation: entry.generation,
                        future: future.clone(),
                    });
                    (entry.next_request, entry.generation, future, CacheStatus::Miss)
                }
            }
        };

        self.logger
            .debug_builder("fetch started")
            .key(key)
            .field_display("status", &status)
            .emit();

        let result = future.await;

        {
            let mut entries = self.lock();
            let entry = entries.entry(key).or_default();
            if entry.inflight.as_ref().map(|f| f.id) == Some(request) {
                entry.inflight = None;
            }
            if entry.generation == generation {
                if let Ok(value) = &result {
                    entry.value = Some(value.clone());
                    entry.stale = false;
                }
            } else {
                self.logger
                    .debug_builder("response outlived invalidation, not stored")
                    .key(key)
                    .emit();
            }
        }

        match result {
            Ok(value) => Ok((value, status)),
            Err(e) => {
                self.logger
                    .warn_builder("fetch failed")
                    .key(key)
                    .field_display("error", &e)
                    .emit();
                Err(CacheError::Fetch(e))
            }
        }
    }

    /// Load `key` and validate it into `T`.
    pub async fn get<T: Payload>(&self, key: ResourceKey) -> CacheResult<T> {
        let (value, _) = self.load(key).await?;
        T::from_json(&value).map_err(|e| CacheError::Invalid(Arc::new(e)))
    }

    /// Mark `key` stale after a write. Outstanding requests are detached so
    /// their (possibly pre-write) responses are not stored.
    pub fn invalidate(&self, key: ResourceKey) {
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(&key) {
            entry.generation += 1;
            entry.stale = true;
            entry.inflight = None;
        }
        drop(entries);

        self.logger.debug_builder("invalidated").key(key).emit();
    }

    /// Invalidate every key.
    pub fn invalidate_all(&self) {
        for key in ResourceKey::ALL {
            self.invalidate(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ResourceKey, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
