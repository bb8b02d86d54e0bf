//! Cache operation errors.

use std::sync::Arc;

use folio_data::FetchError;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The backend request failed. Shared by every de-duplicated waiter.
    #[error("fetch failed: {0}")]
    Fetch(Arc<FetchError>),

    /// The payload arrived but failed boundary validation.
    #[error("invalid payload: {0}")]
    Invalid(Arc<FetchError>),
}

impl CacheError {
    /// The underlying fetch error.
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            Self::Fetch(e) | Self::Invalid(e) => e,
        }
    }
}
