//! Output formatters
//!
//! Provides trait-based output formatting for flow results.

pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::controller::{DirectionsOutcome, ExploreOutcome, LocateView};
use crate::coord::Coordinate;
use crate::destination::Destination;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Anything a command can print
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Report<'a> {
    Explore(&'a ExploreOutcome),
    Located(&'a LocateView),
    Directions(&'a DirectionsOutcome),
    Destination(&'a Destination),
}

impl Report<'_> {
    /// The coordinate a map link should point at, if any
    pub fn focus(&self) -> Option<Coordinate> {
        match self {
            Report::Explore(outcome) => Some(outcome.location.coordinate),
            Report::Located(view) => Some(view.location.coordinate),
            Report::Directions(outcome) => Some(outcome.to.coordinate),
            Report::Destination(_) => None,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a report
    ///
    /// # Arguments
    /// * `report` - The result to format
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, report: Report<'_>, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn OutputFormatter,
        &text::TextFormatter,
        &url::UrlFormatter,
    ]
    .into_iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod samples {
    //! Fixed outcomes for formatter tests

    use crate::controller::{DirectionsOutcome, ExploreOutcome, LocateView, PlacesPanel};
    use crate::coord::{haversine_km, Coordinate};
    use crate::destination::Destination;
    use crate::discovery::{PlaceCard, PlaceSummary, PopularityTier, SyntheticStats};
    use crate::geo::ResolvedLocation;
    use crate::geolocation::PositionReading;
    use crate::travel::estimate;

    pub fn paris() -> ResolvedLocation {
        ResolvedLocation::new(
            Coordinate::new(48.8566, 2.3522).unwrap(),
            "Paris, Ile-de-France, Metropolitan France, France",
        )
    }

    pub fn explore() -> ExploreOutcome {
        let cards = ["Louvre", "Eiffel Tower", "Notre-Dame", "Sacré-Cœur", "Orsay"]
            .iter()
            .map(|name| PlaceCard {
                place: PlaceSummary {
                    name: name.to_string(),
                    description: format!("Why {} is worth it", name),
                },
                synthetic: SyntheticStats {
                    tier: PopularityTier::MostVisited,
                    monthly_visitors: 4321,
                },
            })
            .collect();
        ExploreOutcome {
            query: "Paris".into(),
            location: paris(),
            places: PlacesPanel::Cards(cards),
        }
    }

    pub fn located() -> LocateView {
        LocateView {
            location: paris(),
            reading: PositionReading::new(paris().coordinate, 1500.0),
            precise: false,
        }
    }

    pub fn directions() -> DirectionsOutcome {
        let from = ResolvedLocation::new(Coordinate::new(0.0, 0.0).unwrap(), "Null Island");
        let to = ResolvedLocation::new(Coordinate::new(0.0, 1.0).unwrap(), "One East");
        DirectionsOutcome {
            destination: Destination::new("One East"),
            distance_km: haversine_km(from.coordinate, to.coordinate),
            times: estimate(from.coordinate, to.coordinate),
            from,
            to,
        }
    }
}
