//! tour-explore: tourist place explorer
//!
//! A library and CLI for finding a place, listing the popular tourist spots
//! around it, and estimating how long it takes to get to one of them.
//!
//! ## Features
//!
//! - Forward and reverse geocoding (Nominatim)
//! - Popular place discovery through a text generation service (Gemini)
//! - Straight-line travel time estimates for car, bike, foot and train
//! - Headless map state (marker, accuracy circle, route) for a web front end
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use tour_explore::coord::Coordinate;
//! use tour_explore::travel::{estimate, format_minutes};
//!
//! let louvre = Coordinate::new(48.8606, 2.3376).unwrap();
//! let eiffel = Coordinate::new(48.8584, 2.2945).unwrap();
//!
//! let times = estimate(louvre, eiffel);
//! println!("On foot: {}", format_minutes(times.walk));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod coord;
pub mod destination;
pub mod discovery;
pub mod error;
pub mod format;
pub mod geo;
pub mod geolocation;
pub mod map;
pub mod server;
pub mod travel;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use controller::Controller;
pub use coord::Coordinate;
pub use error::{Error, Result};
