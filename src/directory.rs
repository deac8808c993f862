//! Directory client routing every read through a fetch cache
//!
//! `DirectoryClient` wraps an injected `DataSource` and keeps one `FetchCache` per
//! record type. Cache keys are the backend request paths, so a repeated lookup of
//! the same resource within the freshness window never reaches the source.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{FetchCache, DEFAULT_FRESHNESS_WINDOW};
use crate::data::{endpoints, Airport, Category, DataSource, DirectoryError, Facility, FacilityDetail};

/// Cached, read-only access to airports and their facilities
///
/// Clone is cheap - clones share the same source and caches.
#[derive(Clone)]
pub struct DirectoryClient {
    source: Arc<dyn DataSource>,
    airports: FetchCache<Vec<Airport>, DirectoryError>,
    categories: FetchCache<Vec<Category>, DirectoryError>,
    facilities: FetchCache<Vec<Facility>, DirectoryError>,
    details: FetchCache<FacilityDetail, DirectoryError>,
}

impl DirectoryClient {
    /// Creates a client whose cached records stay fresh for `freshness_window`
    pub fn new(source: Arc<dyn DataSource>, freshness_window: Duration) -> Self {
        info!(
            source = source.name(),
            freshness_secs = freshness_window.as_secs(),
            "directory client created"
        );
        Self {
            source,
            airports: FetchCache::new(freshness_window),
            categories: FetchCache::new(freshness_window),
            facilities: FetchCache::new(freshness_window),
            details: FetchCache::new(freshness_window),
        }
    }

    /// Creates a client with the default 5 minute freshness window
    pub fn with_default_window(source: Arc<dyn DataSource>) -> Self {
        Self::new(source, DEFAULT_FRESHNESS_WINDOW)
    }

    /// Label of the underlying data source
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn freshness_window(&self) -> Duration {
        self.airports.freshness_window()
    }

    /// Lists every airport
    pub async fn airports(&self) -> Result<Arc<Vec<Airport>>, DirectoryError> {
        let source = Arc::clone(&self.source);
        self.airports
            .get(&endpoints::airports(), move || async move {
                source.airports().await
            })
            .await
    }

    /// Lists the facility categories of an airport
    pub async fn categories(&self, airport_id: &str) -> Result<Arc<Vec<Category>>, DirectoryError> {
        let source = Arc::clone(&self.source);
        let airport_id = airport_id.to_string();
        self.categories
            .get(&endpoints::categories(&airport_id), move || async move {
                source.categories(&airport_id).await
            })
            .await
    }

    /// Lists the facilities of one category at an airport
    pub async fn facilities(
        &self,
        airport_id: &str,
        category_id: &str,
    ) -> Result<Arc<Vec<Facility>>, DirectoryError> {
        let source = Arc::clone(&self.source);
        let key = endpoints::facilities(airport_id, category_id);
        let airport_id = airport_id.to_string();
        let category_id = category_id.to_string();
        self.facilities
            .get(&key, move || async move {
                source.facilities(&airport_id, &category_id).await
            })
            .await
    }

    /// Fetches the full record of a facility
    pub async fn facility_detail(
        &self,
        facility_id: &str,
    ) -> Result<Arc<FacilityDetail>, DirectoryError> {
        let source = Arc::clone(&self.source);
        let facility_id = facility_id.to_string();
        self.details
            .get(&endpoints::facility(&facility_id), move || async move {
                source.facility_detail(&facility_id).await
            })
            .await
    }

    /// Resolves a single airport out of the cached airport list
    pub async fn airport(&self, airport_id: &str) -> Result<Airport, DirectoryError> {
        self.airports()
            .await?
            .iter()
            .find(|a| a.id == airport_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("airport '{}'", airport_id)))
    }

    /// Resolves a single category out of the cached category list of an airport
    pub async fn category(
        &self,
        airport_id: &str,
        category_id: &str,
    ) -> Result<Category, DirectoryError> {
        self.categories(airport_id)
            .await?
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("category '{}'", category_id)))
    }

    /// How long ago the detail record of a facility was fetched, if it is cached
    pub fn facility_detail_age(&self, facility_id: &str) -> Option<Duration> {
        self.details.age(&endpoints::facility(facility_id))
    }

    /// Total cached entries across all record types
    pub fn cached_entries(&self) -> usize {
        self.airports.len() + self.categories.len() + self.facilities.len() + self.details.len()
    }
}
