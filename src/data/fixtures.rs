//! Fixture data source
//!
//! Serves directory records from a JSON dataset, either the one bundled into the
//! binary or one loaded from disk. Used for demos and whenever no backend is
//! available.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Airport, Category, DataSource, DirectoryError, Facility, FacilityDetail};

/// Dataset compiled into the binary
const BUNDLED_FIXTURES: &str = include_str!("fixtures.json");

#[derive(Debug, Deserialize)]
struct FixtureData {
    airports: Vec<FixtureAirport>,
}

#[derive(Debug, Deserialize)]
struct FixtureAirport {
    #[serde(flatten)]
    airport: Airport,
    #[serde(default)]
    categories: Vec<FixtureCategory>,
}

#[derive(Debug, Deserialize)]
struct FixtureCategory {
    id: String,
    name: String,
    #[serde(default)]
    facilities: Vec<FacilityDetail>,
}

/// Data source backed by an in-memory fixture dataset
///
/// Category counts are derived from the facilities listed under each category.
/// Clone is cheap - the dataset is shared.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    data: Arc<FixtureData>,
}

impl FixtureSource {
    /// Loads the dataset bundled with the binary
    pub fn bundled() -> Result<Self, DirectoryError> {
        Self::from_json(BUNDLED_FIXTURES)
    }

    /// Loads a dataset from a JSON file
    ///
    /// # Returns
    /// * `Ok(FixtureSource)` if the file can be read and parsed
    /// * `Err(DirectoryError::Fixture)` naming the file otherwise
    pub fn from_path(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
            .map_err(|e| DirectoryError::Fixture(format!("{}: {}", path.display(), e)))
    }

    /// Parses a dataset from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let data: FixtureData =
            serde_json::from_str(json).map_err(|e| DirectoryError::Fixture(e.to_string()))?;
        Ok(Self {
            data: Arc::new(data),
        })
    }

    fn airport(&self, airport_id: &str) -> Result<&FixtureAirport, DirectoryError> {
        self.data
            .airports
            .iter()
            .find(|a| a.airport.id == airport_id)
            .ok_or_else(|| DirectoryError::NotFound(format!("airport '{}'", airport_id)))
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixtures"
    }

    async fn airports(&self) -> Result<Vec<Airport>, DirectoryError> {
        Ok(self
            .data
            .airports
            .iter()
            .map(|a| a.airport.clone())
            .collect())
    }

    async fn categories(&self, airport_id: &str) -> Result<Vec<Category>, DirectoryError> {
        let airport = self.airport(airport_id)?;
        Ok(airport
            .categories
            .iter()
            .map(|c| Category {
                id: c.id.clone(),
                name: c.name.clone(),
                count: c.facilities.len() as u32,
            })
            .collect())
    }

    async fn facilities(
        &self,
        airport_id: &str,
        category_id: &str,
    ) -> Result<Vec<Facility>, DirectoryError> {
        let airport = self.airport(airport_id)?;
        let category = airport
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| {
                DirectoryError::NotFound(format!(
                    "category '{}' at airport '{}'",
                    category_id, airport_id
                ))
            })?;

        Ok(category
            .facilities
            .iter()
            .map(|f| f.facility.clone())
            .collect())
    }

    async fn facility_detail(&self, facility_id: &str) -> Result<FacilityDetail, DirectoryError> {
        for airport in &self.data.airports {
            for category in &airport.categories {
                if let Some(detail) = category
                    .facilities
                    .iter()
                    .find(|f| f.facility.id == facility_id)
                {
                    let mut detail = detail.clone();
                    if detail.category.is_none() {
                        detail.category = Some(category.name.clone());
                    }
                    if detail.airport_name.is_none() {
                        detail.airport_name = Some(airport.airport.name.clone());
                    }
                    return Ok(detail);
                }
            }
        }

        Err(DirectoryError::NotFound(format!(
            "facility '{}'",
            facility_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SMALL_DATASET: &str = r#"{
        "airports": [
            {
                "id": 1, "name": "Test Field", "code": "TST", "city": "Testville",
                "country": "Nowhere", "terminals": 1,
                "categories": [
                    {"id": "Eatery", "name": "Eatery", "facilities": [
                        {"id": 10, "name": "Snack Bar", "location": "Gate 1"}
                    ]}
                ]
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_bundled_dataset_parses() {
        let source = FixtureSource::bundled().expect("Bundled fixtures should parse");
        let airports = source.airports().await.unwrap();

        assert!(airports.len() > 6, "Bundled data should span more than one page");
        assert!(airports.iter().any(|a| a.code == "JFK"));
    }

    #[tokio::test]
    async fn test_bundled_ids_are_unique() {
        let source = FixtureSource::bundled().unwrap();
        let mut ids: Vec<&str> = source
            .data
            .airports
            .iter()
            .flat_map(|a| a.categories.iter())
            .flat_map(|c| c.facilities.iter())
            .map(|f| f.facility.id.as_str())
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), total, "Facility ids must be unique across airports");
    }

    #[tokio::test]
    async fn test_category_counts_match_facilities() {
        let source = FixtureSource::bundled().unwrap();
        let categories = source.categories("jfk").await.unwrap();

        for category in categories {
            let facilities = source.facilities("jfk", &category.id).await.unwrap();
            assert_eq!(category.count as usize, facilities.len());
        }
    }

    #[tokio::test]
    async fn test_unknown_airport_is_not_found() {
        let source = FixtureSource::bundled().unwrap();

        let err = source.categories("zzz").await.unwrap_err();
        assert!(err.is_not_found());

        let err = source.facilities("zzz", "shops").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let source = FixtureSource::bundled().unwrap();
        let err = source.facilities("jfk", "spa").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("spa"));
    }

    #[tokio::test]
    async fn test_detail_fills_category_and_airport_name() {
        let source = FixtureSource::bundled().unwrap();
        let detail = source.facility_detail("jfk-l1").await.unwrap();

        assert_eq!(detail.facility.name, "The Centurion Lounge");
        assert_eq!(detail.category.as_deref(), Some("Lounges"));
        assert_eq!(
            detail.airport_name.as_deref(),
            Some("John F. Kennedy International Airport")
        );
        assert!(detail.amenities.contains(&"Showers".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_facility_is_not_found() {
        let source = FixtureSource::bundled().unwrap();
        let err = source.facility_detail("r1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_from_path_reads_numeric_ids() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(SMALL_DATASET.as_bytes()).unwrap();

        let source = FixtureSource::from_path(file.path()).expect("Should load fixture file");
        let airports = source.airports().await.unwrap();
        assert_eq!(airports[0].id, "1");

        let facilities = source.facilities("1", "Eatery").await.unwrap();
        assert_eq!(facilities[0].id, "10");
        assert_eq!(facilities[0].location.as_deref(), Some("Gate 1"));
    }

    #[test]
    fn test_from_path_missing_file_names_path() {
        let err = FixtureSource::from_path(Path::new("/nonexistent/fixtures.json")).unwrap_err();

        assert!(matches!(err, DirectoryError::Fixture(_)));
        assert!(err.to_string().contains("/nonexistent/fixtures.json"));
    }

    #[test]
    fn test_from_json_rejects_malformed_data() {
        let err = FixtureSource::from_json(r#"{"airports": "nope"}"#).unwrap_err();
        assert!(matches!(err, DirectoryError::Fixture(_)));
    }
}
