//! Straight-line travel time estimates
//!
//! Distance is the great-circle distance; each mode divides it by a fixed
//! average speed. No road network is involved.

use crate::constants::speed::{BIKE_KMH, CAR_KMH, TRAIN_KMH, WALK_KMH};
use crate::coord::{haversine_km, Coordinate};
use serde::{Deserialize, Serialize};

/// Ways of getting to a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Car,
    Bike,
    Walk,
    Train,
}

impl TravelMode {
    /// All modes in display order
    pub const ALL: [TravelMode; 4] = [Self::Car, Self::Bike, Self::Walk, Self::Train];

    /// Average speed in km/h
    pub fn speed_kmh(&self) -> f64 {
        match self {
            Self::Car => CAR_KMH,
            Self::Bike => BIKE_KMH,
            Self::Walk => WALK_KMH,
            Self::Train => TRAIN_KMH,
        }
    }

    /// Label shown on a time card
    pub fn label(&self) -> &'static str {
        match self {
            Self::Car => "By Car",
            Self::Bike => "By Bike",
            Self::Walk => "On Foot",
            Self::Train => "By Train",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Car => write!(f, "car"),
            Self::Bike => write!(f, "bike"),
            Self::Walk => write!(f, "walk"),
            Self::Train => write!(f, "train"),
        }
    }
}

impl std::str::FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "car" | "drive" => Ok(Self::Car),
            "bike" | "bicycle" | "cycle" => Ok(Self::Bike),
            "walk" | "foot" | "on foot" => Ok(Self::Walk),
            "train" | "rail" => Ok(Self::Train),
            _ => Err(format!("Unknown travel mode: {}", s)),
        }
    }
}

/// Minutes per travel mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTimeEstimate {
    pub car: u32,
    pub bike: u32,
    pub walk: u32,
    pub train: u32,
}

impl TravelTimeEstimate {
    /// Minutes for one mode
    pub fn minutes(&self, mode: TravelMode) -> u32 {
        match mode {
            TravelMode::Car => self.car,
            TravelMode::Bike => self.bike,
            TravelMode::Walk => self.walk,
            TravelMode::Train => self.train,
        }
    }

    /// (mode, minutes) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (TravelMode, u32)> + '_ {
        TravelMode::ALL.into_iter().map(move |m| (m, self.minutes(m)))
    }
}

/// Minutes needed to cover `distance_km` at the mode's average speed
///
/// Rounded half-up to whole minutes.
pub fn minutes_for(distance_km: f64, mode: TravelMode) -> u32 {
    let minutes = distance_km / mode.speed_kmh() * 60.0;
    (minutes + 0.5).floor().max(0.0) as u32
}

/// Estimate travel times between two coordinates
pub fn estimate(a: Coordinate, b: Coordinate) -> TravelTimeEstimate {
    estimate_for_distance(haversine_km(a, b))
}

/// Estimate travel times for a known distance in kilometers
pub fn estimate_for_distance(distance_km: f64) -> TravelTimeEstimate {
    TravelTimeEstimate {
        car: minutes_for(distance_km, TravelMode::Car),
        bike: minutes_for(distance_km, TravelMode::Bike),
        walk: minutes_for(distance_km, TravelMode::Walk),
        train: minutes_for(distance_km, TravelMode::Train),
    }
}

/// Render a duration for a time card
///
/// Under an hour: "45 mins". Otherwise "1 hr" or "1 hr 30 min".
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{} mins", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{} hr {} min", hours, rest)
    } else {
        format!("{} hr", hours)
    }
}
