//! Popular place discovery
//!
//! Asks a generative-text service for the most popular tourist places around
//! a location and turns the answer into a fixed-size list of summaries.
//!
//! ## Real vs. synthetic fields
//! [`PlaceSummary`] holds only what the service returned. The popularity tier
//! and visitor count on a [`PlaceCard`] are random decoration for display;
//! they live in [`SyntheticStats`] and must never be treated as data.

pub mod decode;
pub mod gemini;

use crate::error::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One place returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Trait for place discovery backends
pub trait PlaceDiscovery: Send + Sync {
    /// Backend name, for logs and status output
    fn name(&self) -> &'static str;

    /// Fetch exactly five popular places for a location name
    ///
    /// A single attempt; failures surface as `Service` or `MalformedResponse`.
    fn discover(
        &self,
        location: &str,
    ) -> impl std::future::Future<Output = Result<Vec<PlaceSummary>>> + Send;
}

/// Prompt sent to the text service
pub fn build_prompt(location: &str) -> String {
    format!(
        "List exactly {} most popular tourist places in {}. For each place, provide: \
         1) Place name 2) A 20-word description about why to visit. \
         Format as JSON with fields: name, description",
        crate::constants::discovery::PLACE_COUNT,
        location
    )
}

/// Display-only popularity badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopularityTier {
    MostVisited,
    HighlyPopular,
    TouristFavorite,
    WorthVisiting,
    HiddenGem,
}

impl PopularityTier {
    pub const ALL: [PopularityTier; 5] = [
        Self::MostVisited,
        Self::HighlyPopular,
        Self::TouristFavorite,
        Self::WorthVisiting,
        Self::HiddenGem,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MostVisited => "Most Visited",
            Self::HighlyPopular => "Highly Popular",
            Self::TouristFavorite => "Tourist Favorite",
            Self::WorthVisiting => "Worth Visiting",
            Self::HiddenGem => "Hidden Gem",
        }
    }

    /// Badge (text color, background color)
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Self::MostVisited => ("#ef4444", "#fee2e2"),
            Self::HighlyPopular => ("#2563eb", "#dbeafe"),
            Self::TouristFavorite => ("#047857", "#d1fae5"),
            Self::WorthVisiting => ("#7c3aed", "#ede9fe"),
            Self::HiddenGem => ("#d97706", "#fef3c7"),
        }
    }
}

/// Randomly generated card decoration. Not derived from any service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticStats {
    pub tier: PopularityTier,
    pub monthly_visitors: u32,
}

impl SyntheticStats {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let tier = PopularityTier::ALL[rng.gen_range(0..PopularityTier::ALL.len())];
        Self {
            tier,
            monthly_visitors: rng.gen_range(1000..6000),
        }
    }
}

/// A place summary paired with its display decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCard {
    pub place: PlaceSummary,
    pub synthetic: SyntheticStats,
}

/// Pair each summary with random display stats
pub fn decorate<R: Rng>(places: Vec<PlaceSummary>, rng: &mut R) -> Vec<PlaceCard> {
    places
        .into_iter()
        .map(|place| PlaceCard {
            place,
            synthetic: SyntheticStats::random(rng),
        })
        .collect()
}

/// Get the configured discovery backend
pub fn get_discovery(config: &crate::config::Config) -> Result<gemini::GeminiBackend> {
    gemini::GeminiBackend::new(
        &config.discovery.base_url,
        &config.discovery.model,
        config.gemini_api_key(),
    )
}
