//! Outbound HTTP seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
#[cfg(not(target_arch = "wasm32"))]
use url::Url;

/// Sends requests to the portfolio backend.
///
/// Implementations report non-2xx answers as `FetchError::Http`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a JSON document.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    /// DELETE a resource.
    async fn delete(&self, url: &str) -> Result<(), FetchError>;
}

/// `reqwest`-backed transport.
///
/// Relative URLs such as `/api/projects` resolve against the configured
/// origin; without one they are rejected as `FetchError::InvalidUrl`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
    origin: Option<Url>,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            origin: None,
        }
    }

    /// Resolve relative URLs against `origin` (e.g. `http://localhost:3000`).
    pub fn with_origin(mut self, origin: &str) -> Result<Self, FetchError> {
        let origin =
            Url::parse(origin).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", origin, e)))?;
        if origin.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!("{}: not a base URL", origin)));
        }
        self.origin = Some(origin);
        Ok(self)
    }

    /// The absolute URL a request for `url` goes to.
    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        let resolved = match &self.origin {
            Some(origin) => origin.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))
    }

    fn check(url: &str, response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::Http {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(self.resolve(url)?)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Self::check(url, response)?
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn delete(&self, url: &str) -> Result<(), FetchError> {
        let response = self
            .client
            .delete(self.resolve(url)?)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Self::check(url, response).map(|_| ())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url_resolves_against_origin() {
        let transport = HttpTransport::new().with_origin("http://localhost:3000").unwrap();
        assert_eq!(
            transport.resolve("/api/projects").unwrap().as_str(),
            "http://localhost:3000/api/projects"
        );
    }

    #[test]
    fn test_relative_url_without_origin_is_rejected() {
        let err = HttpTransport::new().resolve("/api/projects").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_absolute_url_ignores_origin() {
        let transport = HttpTransport::new().with_origin("http://localhost:3000").unwrap();
        assert_eq!(
            transport.resolve("https://example.com/v1/profile").unwrap().as_str(),
            "https://example.com/v1/profile"
        );
    }

    #[test]
    fn test_origin_must_be_absolute() {
        assert!(matches!(
            HttpTransport::new().with_origin("localhost"),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
