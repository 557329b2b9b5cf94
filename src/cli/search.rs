//! Search command handler
//!
//! Geocodes a place and lists the popular places around it.

use crate::cli::build_controller;
use crate::cli::output::OutputArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::Report;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place to search, e.g. "Kyoto"
    #[arg(required_unless_present = "list_formats")]
    pub query: Option<String>,

    /// Save the Nth listed place (1-5) as the destination
    #[arg(long, short = 's', value_parser = clap::value_parser!(u8).range(1..=5))]
    pub select: Option<u8>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let config = Config::load()?;
    let controller = build_controller(&config)?;

    let query = args.query.unwrap_or_default();
    let outcome = controller.search(&query).await?;

    if let Some(n) = args.select {
        let cards = outcome.places.cards().ok_or_else(|| {
            Error::NotFound("No places were listed, nothing to select".to_string())
        })?;
        let card = cards
            .get(usize::from(n) - 1)
            .ok_or_else(|| Error::NotFound(format!("No place number {}", n)))?;
        let saved = controller.select(&card.place)?;
        eprintln!("Destination set to {}", saved.name);
    }

    args.output.emit(Report::Explore(&outcome), &config)
}
