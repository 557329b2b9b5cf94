//! Directions command handler
//!
//! Estimates travel times from an origin to the selected destination.

use crate::cli::build_controller;
use crate::cli::output::OutputArgs;
use crate::config::Config;
use crate::controller::Origin;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::format::Report;
use clap::Args;

/// Directions command arguments
#[derive(Args)]
pub struct DirectionsArgs {
    /// Where you are, e.g. "Gare du Nord, Paris"
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub from: Option<String>,

    /// Origin latitude
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Origin longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the directions command
pub async fn run(args: DirectionsArgs) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let origin = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Origin::Position(Coordinate::new(lat, lng)?),
        _ => Origin::Query(args.from.unwrap_or_default()),
    };

    let config = Config::load()?;
    let controller = build_controller(&config)?;
    let outcome = controller.directions(&origin).await?;

    args.output.emit(Report::Directions(&outcome), &config)
}
