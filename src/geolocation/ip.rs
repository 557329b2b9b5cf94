//! IP-based position source
//!
//! Uses ip-api.com for IP geolocation with file-based caching. IP positions
//! are city-level, so readings carry a fixed coarse accuracy.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::constants::location::IP_ACCURACY_METERS;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::ResolvedLocation;
use crate::geolocation::{PositionReading, PositionSource, PositionWatch, WatchOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};

/// IP location service with caching
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    client: reqwest::Client,
    endpoint: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

/// Cached location data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLocation {
    location: ResolvedLocation,
    timestamp: u64,
}

impl IpPositionSource {
    /// Create an IP source with the default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(crate::config::defaults::APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP source with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ..Self::new()
        }
    }

    /// Create an IP source without caching
    pub fn without_cache() -> Self {
        Self {
            cache_path: None,
            ..Self::new()
        }
    }

    /// Point at a different ip-api compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Look up the current location, preferring a fresh cache entry
    pub async fn lookup(&self) -> Result<ResolvedLocation> {
        if let Some(cached) = self.load_cache() {
            debug!("Using cached IP location");
            return Ok(cached);
        }

        let location = self.fetch_location().await?;
        self.save_cache(&location);
        Ok(location)
    }

    /// Fetch location from ip-api.com
    async fn fetch_location(&self) -> Result<ResolvedLocation> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Service(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Service(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("Failed to parse IP location response: {}", e)))?;

        Self::to_location(data)
    }

    fn to_location(data: IpApiResponse) -> Result<ResolvedLocation> {
        if data.status != "success" {
            return Err(Error::PositionUnavailable);
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(Error::PositionUnavailable);
        };
        let coordinate = Coordinate::new(lat, lng)?;

        // Build display name from available fields
        let display_name = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(ResolvedLocation::new(
            coordinate,
            if display_name.is_empty() {
                crate::constants::geo::PLACEHOLDER_LABEL.to_string()
            } else {
                display_name
            },
        ))
    }

    /// Load cached location if valid
    fn load_cache(&self) -> Option<ResolvedLocation> {
        let cache_path = self.cache_path.as_ref()?;

        if !cache_path.exists() {
            return None;
        }

        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedLocation = serde_json::from_str(&content).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        if now.saturating_sub(cached.timestamp) < IP_LOCATION_TTL_SECS {
            Some(cached.location)
        } else {
            None
        }
    }

    /// Save location to cache
    fn save_cache(&self, location: &ResolvedLocation) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let cached = CachedLocation {
            location: location.clone(),
            timestamp,
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            if let Err(e) = fs::write(cache_path, content) {
                warn!("Failed to write IP location cache: {}", e);
            }
        }
    }
}

impl Default for IpPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for IpPositionSource {
    fn name(&self) -> &'static str {
        "ip"
    }

    fn watch(&self, _options: WatchOptions) -> PositionWatch {
        let (tx, watch) = PositionWatch::channel(1);
        let source = self.clone();
        tokio::spawn(async move {
            let item = match source.lookup().await {
                Ok(location) => Ok(PositionReading::new(location.coordinate, IP_ACCURACY_METERS)),
                Err(e) => {
                    warn!("IP location failed: {}", e);
                    Err(Error::PositionUnavailable)
                }
            };
            let _ = tx.send(item).await;
        });
        watch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::{locate, LocatePolicy};
    use crate::test_support::spawn_router;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use tempfile::TempDir;

    fn berlin() -> ResolvedLocation {
        ResolvedLocation::new(Coordinate::new(52.52, 13.405).unwrap(), "Berlin")
    }

    #[test]
    fn test_source_creation() {
        assert!(IpPositionSource::new().cache_path.is_some());
        assert!(IpPositionSource::without_cache().cache_path.is_none());
    }

    #[test]
    fn test_cache_operations() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("test_cache.json");
        let source = IpPositionSource::with_cache_path(cache_path);

        assert!(source.load_cache().is_none());

        source.save_cache(&berlin());
        let loaded = source.load_cache().unwrap();
        assert_eq!(loaded.display_name, "Berlin");
    }

    #[test]
    fn test_stale_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("stale.json");
        let stale = CachedLocation {
            location: berlin(),
            timestamp: 1_000,
        };
        fs::write(&cache_path, serde_json::to_string(&stale).unwrap()).unwrap();

        let source = IpPositionSource::with_cache_path(cache_path);
        assert!(source.load_cache().is_none());
    }

    #[test]
    fn test_failed_status_is_unavailable() {
        let data = IpApiResponse {
            status: "fail".into(),
            lat: None,
            lon: None,
            city: None,
            region_name: None,
            country: None,
        };
        assert!(matches!(
            IpPositionSource::to_location(data),
            Err(Error::PositionUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_watch_reports_coarse_reading() {
        let router = Router::new().route(
            "/json",
            get(|| async {
                Json(json!({
                    "status": "success",
                    "lat": 48.1372,
                    "lon": 11.5756,
                    "city": "Munich",
                    "regionName": "Bavaria",
                    "country": "Germany"
                }))
            }),
        );
        let base = spawn_router(router).await;
        let source = IpPositionSource::without_cache().with_endpoint(format!("{}/json", base));

        let found = source.lookup().await.unwrap();
        assert_eq!(found.display_name, "Munich, Bavaria, Germany");

        let outcome = locate(&source, LocatePolicy::default()).await.unwrap();
        assert!(!outcome.precise);
        assert_eq!(outcome.reading.accuracy_m, IP_ACCURACY_METERS);
    }
}
