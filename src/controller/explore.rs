//! Explore page: search a place or use the device position

use crate::constants::map::{ACCURACY_CIRCLE_METERS, FOCUS_ZOOM};
use crate::controller::Controller;
use crate::destination::Destination;
use crate::discovery::{decorate, PlaceCard, PlaceDiscovery, PlaceSummary};
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, ResolvedLocation};
use crate::geolocation::{locate, PositionReading, PositionSource};
use crate::map::{short_label, SharedMap};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const EMPTY_QUERY: &str = "Please enter a location";
pub const LOCATION_NOT_FOUND: &str = "Location not found. Please check the spelling.";
pub const SEARCH_FAILED: &str = "Error searching location. Please try again.";

const PLACES_UNAVAILABLE: &str = "Unable to load popular places at this time.";

/// Where the explore page is in its current flow
///
/// `Idle` only before the first flow. A finished flow leaves its terminal
/// phase (`Rendered`, `SearchFailed` or `LocationFailed`) in place until the
/// next search or locate starts, so status readers can see how the last one
/// ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorePhase {
    Idle,
    Searching,
    Locating,
    Rendered,
    SearchFailed,
    LocationFailed,
}

/// What the popular places section shows after a search
///
/// Either all five cards or a single error message, never a partial list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PlacesPanel {
    Cards(Vec<PlaceCard>),
    Error(String),
}

impl PlacesPanel {
    fn from_discovery(result: Result<Vec<PlaceSummary>>) -> Self {
        match result {
            Ok(places) => PlacesPanel::Cards(decorate(places, &mut rand::thread_rng())),
            Err(e) => {
                warn!("Place discovery failed: {}", e);
                let detail = match e.root() {
                    Error::MalformedResponse(_) | Error::Json(_) => {
                        "The place service sent an unreadable answer."
                    }
                    _ => "The place service could not be reached.",
                };
                PlacesPanel::Error(format!("{} {}", PLACES_UNAVAILABLE, detail))
            }
        }
    }

    pub fn cards(&self) -> Option<&[PlaceCard]> {
        match self {
            PlacesPanel::Cards(cards) => Some(cards),
            PlacesPanel::Error(_) => None,
        }
    }
}

/// Result of a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreOutcome {
    /// What the user typed, used for discovery and the report title
    pub query: String,
    pub location: ResolvedLocation,
    pub places: PlacesPanel,
}

/// Result of using the device position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateView {
    pub location: ResolvedLocation,
    pub reading: PositionReading,
    /// Whether the reading met the high-accuracy threshold
    pub precise: bool,
}

/// Marker, circle and animated focus for a place
async fn show_place(map: &SharedMap, location: &ResolvedLocation) {
    let mut map = map.lock().await;
    map.set_marker(location.coordinate, short_label(&location.display_name));
    map.set_accuracy_circle(location.coordinate, ACCURACY_CIRCLE_METERS);
    map.focus(location.coordinate, FOCUS_ZOOM);
}

impl<G: GeoBackend, D: PlaceDiscovery> Controller<G, D> {
    /// Search a place, show it, and list popular places around it
    ///
    /// Geocoding failures fail the whole search. A discovery failure still
    /// renders the place, with an error in the places panel.
    pub async fn search(&self, query: &str) -> Result<ExploreOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery(EMPTY_QUERY.to_string()));
        }

        self.enter_explore(ExplorePhase::Searching).await;
        info!("Searching '{}'", query);

        let location = match self.geo.forward(query).await {
            Ok(location) => location,
            Err(e) => {
                self.enter_explore(ExplorePhase::SearchFailed).await;
                return Err(match e {
                    Error::NotFound(_) => e.with_notice(LOCATION_NOT_FOUND),
                    _ => e.with_notice(SEARCH_FAILED),
                });
            }
        };

        show_place(&self.explore_map, &location).await;

        let places = PlacesPanel::from_discovery(self.discovery.discover(query).await);

        self.enter_explore(ExplorePhase::Rendered).await;
        Ok(ExploreOutcome {
            query: query.to_string(),
            location,
            places,
        })
    }

    /// Find the device position and show it
    ///
    /// Waits for a precise reading and settles for a coarse one when the
    /// watch window closes. The place name falls back to a generic label.
    pub async fn locate<S: PositionSource + ?Sized>(&self, source: &S) -> Result<LocateView> {
        self.enter_explore(ExplorePhase::Locating).await;
        info!("Locating with {}", source.name());

        let outcome = match locate(source, self.locate_policy).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.enter_explore(ExplorePhase::LocationFailed).await;
                return Err(e);
            }
        };

        let location = self
            .geo
            .reverse_or_placeholder(outcome.reading.coordinate)
            .await;
        show_place(&self.explore_map, &location).await;

        self.enter_explore(ExplorePhase::Rendered).await;
        Ok(LocateView {
            location,
            reading: outcome.reading,
            precise: outcome.precise,
        })
    }

    /// Remember a place for the directions page
    pub fn select(&self, place: &PlaceSummary) -> Result<Destination> {
        let saved = self.store.save(&Destination::from(place))?;
        info!("Selected destination '{}'", saved.name);
        Ok(saved)
    }
}
