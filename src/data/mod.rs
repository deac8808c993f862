//! Core data models for the airport directory
//!
//! This module contains the records consumed by the directory (airports, facility
//! categories, facilities and facility details) together with the `DataSource`
//! trait that produces them, either over HTTP or from bundled fixtures.

pub mod endpoints;
pub mod error;
pub mod fixtures;
pub mod http;

pub use error::DirectoryError;
pub use fixtures::FixtureSource;
pub use http::HttpSource;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// An airport listed in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Unique identifier used in request paths
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Human-readable airport name
    pub name: String,
    /// IATA code, e.g. "JFK"
    pub code: String,
    pub city: String,
    pub country: String,
    /// Number of passenger terminals
    #[serde(default)]
    pub terminals: u32,
}

/// A facility category offered at an airport (restaurants, shops, lounges, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    /// Number of facilities in this category
    #[serde(default)]
    pub count: u32,
}

/// A facility as shown in a category listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    /// Where in the airport the facility is, e.g. "Terminal 4, Gate B20"
    #[serde(default)]
    pub location: Option<String>,
    /// Opening hours as free text
    #[serde(default)]
    pub hours: Option<String>,
}

/// Full record for a single facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityDetail {
    #[serde(flatten)]
    pub facility: Facility,
    /// Name of the category the facility belongs to
    #[serde(default, rename = "type")]
    pub category: Option<String>,
    #[serde(default)]
    pub airport_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub access_info: Option<String>,
    #[serde(default)]
    pub rates: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Read-only access to directory records
///
/// Implemented by `HttpSource` for a live backend and `FixtureSource` for bundled
/// data. The directory client only ever sees this trait, so the choice between the
/// two is made once at startup.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    async fn airports(&self) -> Result<Vec<Airport>, DirectoryError>;

    async fn categories(&self, airport_id: &str) -> Result<Vec<Category>, DirectoryError>;

    async fn facilities(
        &self,
        airport_id: &str,
        category_id: &str,
    ) -> Result<Vec<Facility>, DirectoryError>;

    /// Fails with `DirectoryError::NotFound` if no facility has this id
    async fn facility_detail(&self, facility_id: &str) -> Result<FacilityDetail, DirectoryError>;
}

/// Accepts ids sent either as JSON strings or as integers (the SQLite backend uses integers)
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
