//! Geocoding module
//!
//! Forward geocoding (place name to coordinate) and reverse geocoding
//! (coordinate to place name) against an external service. Nothing is
//! cached: every call is a fresh request.

pub mod nominatim;

use crate::constants::geo::PLACEHOLDER_LABEL;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A geocoded location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    /// Display name (address or description)
    pub display_name: String,
}

impl ResolvedLocation {
    pub fn new(coordinate: Coordinate, display_name: impl Into<String>) -> Self {
        Self {
            coordinate,
            display_name: display_name.into(),
        }
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the best match for the query, or None if not found
    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<ResolvedLocation>>> + Send;

    /// Reverse geocode coordinates to a location name
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl std::future::Future<Output = Result<Option<ResolvedLocation>>> + Send;
}

/// Forward and reverse lookups with the error policy the flows rely on
#[derive(Debug, Clone)]
pub struct GeoLookup<B> {
    backend: B,
}

impl<B: GeoBackend> GeoLookup<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve a place name to its single best match
    ///
    /// Fails with `NotFound` when the service has no match.
    pub async fn forward(&self, query: &str) -> Result<ResolvedLocation> {
        debug!("Geocoding '{}'", query);
        self.backend
            .geocode(query)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No match for '{}'", query)))
    }

    /// Resolve a coordinate to a place name
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<ResolvedLocation> {
        debug!("Reverse geocoding {}", coordinate);
        self.backend
            .reverse_geocode(coordinate)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No place at {}", coordinate)))
    }

    /// Reverse geocode, labelling the position generically on any failure
    ///
    /// The returned location always carries the input coordinate, even when
    /// the service snapped the match to a nearby feature.
    pub async fn reverse_or_placeholder(&self, coordinate: Coordinate) -> ResolvedLocation {
        match self.reverse(coordinate).await {
            Ok(found) if !found.display_name.trim().is_empty() => {
                ResolvedLocation::new(coordinate, found.display_name)
            }
            Ok(_) => ResolvedLocation::new(coordinate, PLACEHOLDER_LABEL),
            Err(e) => {
                warn!("Reverse geocoding failed, using placeholder: {}", e);
                ResolvedLocation::new(coordinate, PLACEHOLDER_LABEL)
            }
        }
    }
}

/// Get the default geocoding backend
pub fn get_geocoder(config: &crate::config::Config) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::with_base_url(
        &config.geocoding.base_url,
        &config.geocoding.user_agent,
    )
}


#[cfg(test)]
mod tests {
    use super::fake::FakeGeocoder;
    use super::*;

    #[tokio::test]
    async fn test_forward_found() {
        let lookup = GeoLookup::new(FakeGeocoder::default().with_place(
            "Paris",
            48.8566,
            2.3522,
            "Paris, Ile-de-France, France",
        ));
        let found = lookup.forward("Paris").await.unwrap();
        assert_eq!(found.display_name, "Paris, Ile-de-France, France");
    }

    #[tokio::test]
    async fn test_forward_not_found() {
        let lookup = GeoLookup::new(FakeGeocoder::default());
        let err = lookup.forward("Atlantis").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_forward_service_error_passes_through() {
        let lookup = GeoLookup::new(FakeGeocoder::failing());
        let err = lookup.forward("Paris").await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
    }

    #[tokio::test]
    async fn test_reverse_falls_back_on_error() {
        let lookup = GeoLookup::new(FakeGeocoder::failing());
        let here = Coordinate::new(10.0, 20.0).unwrap();
        let resolved = lookup.reverse_or_placeholder(here).await;
        assert_eq!(resolved.display_name, "Your Location");
        assert_eq!(resolved.coordinate, here);
    }

    #[tokio::test]
    async fn test_reverse_falls_back_on_empty() {
        let lookup = GeoLookup::new(FakeGeocoder::default());
        let here = Coordinate::new(10.0, 20.0).unwrap();
        assert_eq!(
            lookup.reverse_or_placeholder(here).await.display_name,
            "Your Location"
        );
    }

    #[tokio::test]
    async fn test_reverse_uses_service_name() {
        let geocoder = FakeGeocoder {
            reverse_name: Some("Main Street, Springfield".into()),
            ..FakeGeocoder::default()
        };
        let lookup = GeoLookup::new(geocoder);
        let here = Coordinate::new(10.0, 20.0).unwrap();
        let resolved = lookup.reverse_or_placeholder(here).await;
        assert_eq!(resolved.display_name, "Main Street, Springfield");
        assert_eq!(lookup.backend().calls(), 1);
    }
}
