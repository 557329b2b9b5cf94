//! Server shared state
//!
//! Holds the page controller and the fallback position source for the
//! HTTP server.

use crate::config::Config;
use crate::controller::Controller;
use crate::destination::DestinationStore;
use crate::discovery::gemini::GeminiBackend;
use crate::discovery::{get_discovery, PlaceDiscovery};
use crate::error::Result;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{get_geocoder, GeoBackend};
use crate::geolocation::ip::IpPositionSource;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState<G = NominatimBackend, D = GeminiBackend> {
    /// Explore and directions flows
    pub controller: Controller<G, D>,

    /// Used by `/api/locate` when the client sends no position
    pub ip_source: IpPositionSource,

    started: Instant,
}

impl AppState {
    /// Create application state with the configured services
    pub fn new(config: &Config) -> Result<Self> {
        let controller = Controller::new(
            get_geocoder(config)?,
            get_discovery(config)?,
            DestinationStore::from_config(config)?,
            &config.map,
        );
        Ok(Self::with_controller(controller))
    }
}

impl<G: GeoBackend, D: PlaceDiscovery> AppState<G, D> {
    /// Create application state around an existing controller
    pub fn with_controller(controller: Controller<G, D>) -> Self {
        Self {
            controller,
            ip_source: IpPositionSource::new(),
            started: Instant::now(),
        }
    }

    pub fn with_ip_source(mut self, source: IpPositionSource) -> Self {
        self.ip_source = source;
        self
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
