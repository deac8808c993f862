//! Request paths for the directory backend
//!
//! The same strings double as fetch cache keys, so two requests for the same
//! resource and query always land on the same cache entry.

use std::borrow::Cow;

/// `GET /airports`
pub fn airports() -> String {
    "/airports".to_string()
}

/// `GET /airports/{airport_id}/facility-types`
pub fn categories(airport_id: &str) -> String {
    format!("/airports/{}/facility-types", encode(airport_id))
}

/// `GET /airports/{airport_id}/facilities?type={category_id}`
pub fn facilities(airport_id: &str, category_id: &str) -> String {
    format!(
        "/airports/{}/facilities?type={}",
        encode(airport_id),
        encode(category_id)
    )
}

/// `GET /facilities/{facility_id}`
pub fn facility(facility_id: &str) -> String {
    format!("/facilities/{}", encode(facility_id))
}

/// Percent-encodes everything outside the RFC 3986 unreserved set
fn encode(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}
