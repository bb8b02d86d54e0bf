//! Read endpoints and the project persistence seam.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_core::{ApiConfig, ResourceKey};
use serde_json::Value;

use crate::error::FetchError;
use crate::model::ProjectId;
use crate::retry::RetryPolicy;
use crate::transport::Transport;

/// Persists project mutations. Only deletion is driven from this layer;
/// create and update belong to the edit modal.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn delete_project(&self, id: &ProjectId) -> Result<(), FetchError>;
}

/// Maps resource keys to backend endpoints.
#[derive(Clone)]
pub struct PortfolioApi {
    transport: Arc<dyn Transport>,
    config: ApiConfig,
    retry: RetryPolicy,
}

impl PortfolioApi {
    /// Create an API client. Retries are disabled.
    pub fn new(transport: Arc<dyn Transport>, config: ApiConfig) -> Self {
        Self {
            transport,
            config,
            retry: RetryPolicy::none(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL for a resource.
    pub fn url_for(&self, key: ResourceKey) -> String {
        self.config.url_for(key.path())
    }

    /// GET the raw payload for a resource.
    pub async fn read(&self, key: ResourceKey) -> Result<Value, FetchError> {
        let url = self.url_for(key);
        let mut attempt = 0;
        loop {
            match self.transport.get_json(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if self.retry.should_retry(&e, attempt) => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ProjectStore for PortfolioApi {
    async fn delete_project(&self, id: &ProjectId) -> Result<(), FetchError> {
        let url = self.config.url_for(&format!(
            "{}/{}",
            ResourceKey::Projects.path(),
            encode_segment(id.as_str())
        ));
        self.transport.delete(&url).await
    }
}

/// Percent-encode `raw` as a single path segment. Slashes, `?`, `#` and
/// the dot segments `.`/`..` cannot escape the collection path.
pub fn encode_segment(raw: &str) -> String {
    match raw {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => url::form_urlencoded::byte_serialize(raw.as_bytes())
            .collect::<String>()
            .replace('+', "%20"),
    }
}

/// In-memory transport (for development/testing).
///
/// Serves canned JSON by URL and records every request. A DELETE of
/// `<collection>/<id>` removes the matching element from a stored array.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    routes: HashMap<String, Result<Value, u16>>,
    gets: Vec<String>,
    deletes: Vec<String>,
    delete_failure: Option<u16>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for GET `url`.
    pub fn set_json(&self, url: impl Into<String>, value: Value) {
        self.lock().routes.insert(url.into(), Ok(value));
    }

    /// Answer GET `url` with an HTTP error status.
    pub fn set_status(&self, url: impl Into<String>, status: u16) {
        self.lock().routes.insert(url.into(), Err(status));
    }

    /// Make every DELETE fail with `status`.
    pub fn fail_deletes(&self, status: u16) {
        self.lock().delete_failure = Some(status);
    }

    /// Number of GETs issued for `url`.
    pub fn get_count(&self, url: &str) -> usize {
        self.lock().gets.iter().filter(|u| *u == url).count()
    }

    /// URLs of every DELETE issued, in order.
    pub fn deletes(&self) -> Vec<String> {
        self.lock().deletes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut state = self.lock();
        state.gets.push(url.to_string());
        match state.routes.get(url) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(status)) => Err(FetchError::Http {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Http {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    async fn delete(&self, url: &str) -> Result<(), FetchError> {
        let mut state = self.lock();
        state.deletes.push(url.to_string());
        if let Some(status) = state.delete_failure {
            return Err(FetchError::Http {
                status,
                url: url.to_string(),
            });
        }

        let Some((collection, segment)) = url.rsplit_once('/') else {
            return Ok(());
        };
        if let Some(Ok(Value::Array(items))) = state.routes.get_mut(collection) {
            items.retain(|item| match item.get("id") {
                Some(Value::String(s)) => encode_segment(s) != segment,
                Some(Value::Number(n)) => n.to_string() != segment,
                _ => true,
            });
        }
        Ok(())
    }
}
