//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::api::NOMINATIM_URL;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, ResolvedLocation};
use serde::Deserialize;
use tracing::debug;

pub const USER_AGENT: &str = concat!("tour-explore/", env!("CARGO_PKG_VERSION"));

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search/reverse response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Reverse lookups answer `{"error": "Unable to geocode"}` for open water etc.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Found(NominatimResult),
    Missing { error: String },
}

impl NominatimBackend {
    /// Create a backend for the public Nominatim instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(NOMINATIM_URL, USER_AGENT)
    }

    /// Create a backend against a specific Nominatim instance
    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn to_location(result: NominatimResult) -> Result<ResolvedLocation> {
        let coordinate = Coordinate::parse(&result.lat, &result.lon)
            .map_err(|e| Error::Service(format!("Nominatim returned bad coordinates: {}", e)))?;
        Ok(ResolvedLocation::new(coordinate, result.display_name))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Service(format!("Nominatim request failed: {}", e)))
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(Error::Service(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("Failed to parse Nominatim response: {}", e)))?;

        results.into_iter().next().map(Self::to_location).transpose()
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<ResolvedLocation>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url,
            coordinate.lat(),
            coordinate.lng()
        );

        let response = self.get(&url).await?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Service(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("Failed to parse Nominatim response: {}", e)))?;

        match result {
            ReverseResponse::Found(found) => Self::to_location(found).map(Some),
            ReverseResponse::Missing { error } => {
                debug!("Nominatim reverse miss: {}", error);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn fake_nominatim() -> Router {
        Router::new()
            .route(
                "/search",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(params.get("limit").map(String::as_str), Some("1"));
                    match params.get("q").map(String::as_str) {
                        Some("Eiffel Tower") => Json(json!([{
                            "lat": "48.8582599",
                            "lon": "2.2945006",
                            "display_name": "Eiffel Tower, Avenue Gustave Eiffel, Paris, France"
                        }])),
                        Some("bad coords") => Json(json!([{
                            "lat": "north",
                            "lon": "2.0",
                            "display_name": "Broken"
                        }])),
                        _ => Json(json!([])),
                    }
                }),
            )
            .route(
                "/reverse",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let lat: f64 = params["lat"].parse().unwrap();
                    if lat > 80.0 {
                        return Json(json!({"error": "Unable to geocode"}));
                    }
                    Json(json!({
                        "lat": params["lat"],
                        "lon": params["lon"],
                        "display_name": "Somewhere Street, Sometown"
                    }))
                }),
            )
    }

    async fn backend(router: Router) -> NominatimBackend {
        let base = spawn_router(router).await;
        NominatimBackend::with_base_url(&base, "tour-explore-tests").unwrap()
    }

    #[tokio::test]
    async fn test_geocode_parses_string_coordinates() {
        let backend = backend(fake_nominatim()).await;
        let found = backend.geocode("Eiffel Tower").await.unwrap().unwrap();
        assert!((found.coordinate.lat() - 48.8582599).abs() < 1e-9);
        assert!((found.coordinate.lng() - 2.2945006).abs() < 1e-9);
        assert!(found.display_name.starts_with("Eiffel Tower"));
    }

    #[tokio::test]
    async fn test_geocode_zero_results() {
        let backend = backend(fake_nominatim()).await;
        assert!(backend.geocode("Nowhere at all").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_bad_coordinates_is_service_error() {
        let backend = backend(fake_nominatim()).await;
        let err = backend.geocode("bad coords").await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let backend = backend(fake_nominatim()).await;
        let here = Coordinate::new(10.5, 20.25).unwrap();
        let found = backend.reverse_geocode(here).await.unwrap().unwrap();
        assert_eq!(found.display_name, "Somewhere Street, Sometown");
    }

    #[tokio::test]
    async fn test_reverse_geocode_error_object_is_none() {
        let backend = backend(fake_nominatim()).await;
        let pole = Coordinate::new(89.0, 0.0).unwrap();
        assert!(backend.reverse_geocode(pole).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let router = Router::new().route(
            "/search",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(Value::Null)) }),
        );
        let backend = backend(router).await;
        let err = backend.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on port 9 of localhost in the test environment
        let backend = NominatimBackend::with_base_url("http://127.0.0.1:9", "t").unwrap();
        let err = backend.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
    }

    #[test]
    fn test_backend_creation() {
        let backend = NominatimBackend::new().unwrap();
        assert!(format!("{:?}", backend).contains("NominatimBackend"));
        assert_eq!(backend.base_url, NOMINATIM_URL);
    }
}
