//! Shared page state.

use std::sync::Arc;

use folio_cache::ResourceCache;
use folio_core::PortfolioConfig;
#[cfg(not(target_arch = "wasm32"))]
use folio_core::ResourceKey;
#[cfg(not(target_arch = "wasm32"))]
use folio_data::FetchError;
use folio_data::{PortfolioApi, Transport};
use folio_observability::StructuredLogger;

/// Everything the sections share: config, the API client and one cache.
#[derive(Clone)]
pub struct PortfolioState {
    pub config: PortfolioConfig,
    pub api: PortfolioApi,
    pub cache: ResourceCache,
}

impl PortfolioState {
    pub fn new(transport: Arc<dyn Transport>, config: PortfolioConfig) -> Self {
        let api = PortfolioApi::new(transport, config.api.clone());
        let cache = ResourceCache::new(api.clone())
            .with_logger(StructuredLogger::from_config(&config.logging));
        Self { config, api, cache }
    }

    /// State backed by the HTTP transport.
    ///
    /// A relative `api.base_url` needs `api.origin`; the combination is
    /// checked here rather than on the first fetch.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn http(config: PortfolioConfig) -> Result<Self, FetchError> {
        let mut transport = folio_data::HttpTransport::new();
        if let Some(origin) = &config.api.origin {
            transport = transport.with_origin(origin)?;
        }
        transport.resolve(&config.api.url_for(ResourceKey::Projects.path()))?;
        Ok(Self::new(Arc::new(transport), config))
    }
}
