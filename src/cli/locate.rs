//! Locate command handler
//!
//! Shows the current position, from explicit coordinates or IP geolocation.

use crate::cli::build_controller;
use crate::cli::output::OutputArgs;
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::format::Report;
use crate::geolocation::fixed::FixedPositionSource;
use crate::geolocation::ip::IpPositionSource;
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Latitude
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Accuracy of the given position in meters
    #[arg(long, default_value_t = 0.0)]
    pub accuracy: f64,

    /// Skip the IP location cache
    #[arg(long)]
    pub no_cache: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let config = Config::load()?;
    let controller = build_controller(&config)?;

    let view = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let source = FixedPositionSource::new(Coordinate::new(lat, lng)?, args.accuracy.max(0.0));
            controller.locate(&source).await?
        }
        _ => {
            let source = if args.no_cache {
                IpPositionSource::without_cache()
            } else {
                IpPositionSource::new()
            };
            controller.locate(&source).await?
        }
    };

    args.output.emit(Report::Located(&view), &config)
}
