//! HTTP data source for the directory backend
//!
//! Fetches airports, categories and facilities as JSON over `GET` requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{endpoints, Airport, Category, DataSource, DirectoryError, Facility, FacilityDetail};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the directory REST API
///
/// Clone is cheap - reqwest::Client shares its connection pool between clones.
#[derive(Debug, Clone)]
pub struct HttpSource {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL without a trailing slash
    base_url: String,
}

impl HttpSource {
    /// Creates a new HttpSource pointed at `base_url`
    pub fn new(base_url: &str) -> Result<Self, DirectoryError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path from `endpoints`
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Performs a GET request and decodes the JSON body
    ///
    /// # Returns
    /// * `Ok(T)` - The decoded body of a successful response
    /// * `Err(DirectoryError::NotFound)` - The server answered 404
    /// * `Err(DirectoryError::Status)` - Any other non-success status
    /// * `Err(DirectoryError::Transport)` - The request could not be sent
    /// * `Err(DirectoryError::InvalidResponse)` - The body was not the expected JSON
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DirectoryError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "request failed");
            DirectoryError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "request returned error status");
            return Err(DirectoryError::from_status(status, &body, path));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(format!("{}: {}", path, e)))
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn airports(&self) -> Result<Vec<Airport>, DirectoryError> {
        self.get_json(&endpoints::airports()).await
    }

    async fn categories(&self, airport_id: &str) -> Result<Vec<Category>, DirectoryError> {
        self.get_json(&endpoints::categories(airport_id)).await
    }

    async fn facilities(
        &self,
        airport_id: &str,
        category_id: &str,
    ) -> Result<Vec<Facility>, DirectoryError> {
        self.get_json(&endpoints::facilities(airport_id, category_id))
            .await
    }

    async fn facility_detail(&self, facility_id: &str) -> Result<FacilityDetail, DirectoryError> {
        self.get_json(&endpoints::facility(facility_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let source = HttpSource::new("http://example.test/api/").unwrap();
        assert_eq!(source.base_url(), "http://example.test/api");
        assert_eq!(
            source.url(&endpoints::airports()),
            "http://example.test/api/airports"
        );
    }

    #[test]
    fn test_default_points_at_local_backend() {
        let source = HttpSource::default();
        assert_eq!(source.base_url(), DEFAULT_BASE_URL);
        assert_eq!(source.name(), "http");
    }

    #[test]
    fn test_facility_url_includes_query() {
        let source = HttpSource::new("http://example.test/api").unwrap();
        assert_eq!(
            source.url(&endpoints::facilities("1", "Eatery")),
            "http://example.test/api/airports/1/facilities?type=Eatery"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 1 on loopback is never listening in test environments.
        let source = HttpSource::new("http://127.0.0.1:1/api").unwrap();

        let err = source.airports().await.unwrap_err();

        assert!(
            matches!(err, DirectoryError::Transport(_)),
            "Expected transport error, got {:?}",
            err
        );
    }
}
