//! Page flows
//!
//! The [`Controller`] drives the two pages of the app. The explore page
//! searches a place, shows it on a map and lists popular places around it;
//! the directions page routes from an origin to the place picked there.
//!
//! Each page owns one [`SharedMap`]. Flows on the same page may overlap: the
//! map is locked only while a flow applies its overlays, so whichever flow
//! finishes last decides what the map shows. In-flight flows are never
//! cancelled.

pub mod directions;
pub mod explore;

pub use directions::{DirectionsOutcome, DirectionsPhase, Origin};
pub use explore::{ExploreOutcome, ExplorePhase, LocateView, PlacesPanel};

use crate::config::MapConfig;
use crate::destination::DestinationStore;
use crate::discovery::PlaceDiscovery;
use crate::geo::{GeoBackend, GeoLookup};
use crate::geolocation::LocatePolicy;
use crate::map::{MapView, SharedMap};
use tokio::sync::RwLock;

/// Drives the explore and directions pages
pub struct Controller<G, D> {
    geo: GeoLookup<G>,
    discovery: D,
    store: DestinationStore,
    explore_map: SharedMap,
    directions_map: SharedMap,
    explore_phase: RwLock<ExplorePhase>,
    directions_phase: RwLock<DirectionsPhase>,
    locate_policy: LocatePolicy,
}

impl<G: GeoBackend, D: PlaceDiscovery> Controller<G, D> {
    /// Create a controller with fresh maps for both pages
    pub fn new(geocoder: G, discovery: D, store: DestinationStore, map: &MapConfig) -> Self {
        Self {
            geo: GeoLookup::new(geocoder),
            discovery,
            store,
            explore_map: MapView::from_config(map).shared(),
            directions_map: MapView::from_config(map).shared(),
            explore_phase: RwLock::new(ExplorePhase::Idle),
            directions_phase: RwLock::new(DirectionsPhase::Idle),
            locate_policy: LocatePolicy::default(),
        }
    }

    pub fn with_locate_policy(mut self, policy: LocatePolicy) -> Self {
        self.locate_policy = policy;
        self
    }

    pub fn geo(&self) -> &GeoLookup<G> {
        &self.geo
    }

    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    pub fn store(&self) -> &DestinationStore {
        &self.store
    }

    pub fn explore_map(&self) -> SharedMap {
        self.explore_map.clone()
    }

    pub fn directions_map(&self) -> SharedMap {
        self.directions_map.clone()
    }

    pub async fn explore_phase(&self) -> ExplorePhase {
        *self.explore_phase.read().await
    }

    pub async fn directions_phase(&self) -> DirectionsPhase {
        *self.directions_phase.read().await
    }

    async fn enter_explore(&self, phase: ExplorePhase) {
        *self.explore_phase.write().await = phase;
    }

    async fn enter_directions(&self, phase: DirectionsPhase) {
        *self.directions_phase.write().await = phase;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Controller wired to fakes

    use super::*;
    use crate::discovery::fake::FakeDiscovery;
    use crate::geo::fake::FakeGeocoder;
    use tempfile::TempDir;

    pub type TestController = Controller<FakeGeocoder, FakeDiscovery>;

    pub fn geocoder() -> FakeGeocoder {
        FakeGeocoder::default()
            .with_place(
                "Paris",
                48.8566,
                2.3522,
                "Paris, Ile-de-France, Metropolitan France, France",
            )
            .with_place("Louvre", 48.8606, 2.3376, "Louvre Museum, Rue de Rivoli, Paris, France")
            .with_place("Eiffel Tower", 48.8584, 2.2945, "Eiffel Tower, Avenue Anatole France, Paris, France")
    }

    pub fn controller(geocoder: FakeGeocoder, discovery: FakeDiscovery) -> (TempDir, TestController) {
        let dir = TempDir::new().unwrap();
        let store = DestinationStore::at(dir.path().join("destination.json"));
        let controller = Controller::new(geocoder, discovery, store, &MapConfig::default());
        (dir, controller)
    }
}
