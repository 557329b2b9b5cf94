//! Directions page: route from an origin to the selected destination

use crate::constants::geo::PLACEHOLDER_LABEL;
use crate::controller::Controller;
use crate::coord::{haversine_km, Coordinate};
use crate::destination::Destination;
use crate::discovery::PlaceDiscovery;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, ResolvedLocation};
use crate::travel::{estimate_for_distance, TravelTimeEstimate};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const EMPTY_ORIGIN: &str = "Please enter your current location";
pub const LOCATIONS_NOT_FOUND: &str = "Could not find one or both locations. Please try again.";
pub const DIRECTIONS_FAILED: &str = "Error getting directions. Please try again.";

/// Where the directions page is; the terminal phase stays until the next run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionsPhase {
    Idle,
    Loading,
    Rendered,
    LookupFailed,
}

/// Where the route starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Free text, resolved by forward geocoding
    Query(String),
    /// A known position
    Position(Coordinate),
}

/// Result of a directions lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsOutcome {
    pub destination: Destination,
    pub from: ResolvedLocation,
    pub to: ResolvedLocation,
    /// Straight-line distance
    pub distance_km: f64,
    pub times: TravelTimeEstimate,
}

impl<G: GeoBackend, D: PlaceDiscovery> Controller<G, D> {
    /// Route from `origin` to the stored destination
    ///
    /// Both ends are resolved before anything is drawn. If either cannot be
    /// found the map is left untouched.
    pub async fn directions(&self, origin: &Origin) -> Result<DirectionsOutcome> {
        if let Origin::Query(text) = origin {
            if text.trim().is_empty() {
                return Err(Error::InvalidQuery(EMPTY_ORIGIN.to_string()));
            }
        }

        self.enter_directions(DirectionsPhase::Loading).await;

        match self.resolve_route(origin).await {
            Ok(outcome) => {
                {
                    let mut map = self.directions_map.lock().await;
                    map.set_marker(outcome.to.coordinate, outcome.destination.name.clone());
                    map.draw_route(outcome.from.coordinate, outcome.to.coordinate);
                }
                info!(
                    "Route to '{}': {:.1} km",
                    outcome.destination.name, outcome.distance_km
                );
                self.enter_directions(DirectionsPhase::Rendered).await;
                Ok(outcome)
            }
            Err(e) => {
                self.enter_directions(DirectionsPhase::LookupFailed).await;
                Err(e)
            }
        }
    }

    async fn resolve_route(&self, origin: &Origin) -> Result<DirectionsOutcome> {
        let destination = self.store.load()?;

        let from = match origin {
            Origin::Query(text) => self.geo.forward(text.trim()).await,
            Origin::Position(coordinate) => {
                Ok(ResolvedLocation::new(*coordinate, PLACEHOLDER_LABEL))
            }
        };
        let from = from.map_err(lookup_notice)?;
        let to = self
            .geo
            .forward(&destination.name)
            .await
            .map_err(lookup_notice)?;

        let distance_km = haversine_km(from.coordinate, to.coordinate);
        Ok(DirectionsOutcome {
            destination,
            from,
            to,
            distance_km,
            times: estimate_for_distance(distance_km),
        })
    }
}

fn lookup_notice(e: Error) -> Error {
    match e {
        Error::NotFound(_) => e.with_notice(LOCATIONS_NOT_FOUND),
        _ => e.with_notice(DIRECTIONS_FAILED),
    }
}
