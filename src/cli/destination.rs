//! Destination command handlers
//!
//! `select` stores a destination; `destination` shows or clears it.

use crate::cli::output::OutputArgs;
use crate::config::Config;
use crate::destination::{Destination, DestinationStore};
use crate::error::Result;
use crate::format::Report;
use clap::Args;

/// Select command arguments
#[derive(Args)]
pub struct SelectArgs {
    /// Place name, as listed by `search`
    pub name: String,

    /// Short description shown with the destination
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

/// Destination command arguments
#[derive(Args)]
pub struct DestinationArgs {
    /// Forget the selected destination
    #[arg(long)]
    pub clear: bool,

    /// Show the destination file path
    #[arg(long)]
    pub path: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the select command
pub fn select(args: SelectArgs) -> Result<()> {
    let config = Config::load()?;
    let store = DestinationStore::from_config(&config)?;

    let mut destination = Destination::new(args.name);
    if let Some(description) = args.description {
        destination = destination.with_description(description);
    }

    let saved = store.save(&destination)?;
    println!("Destination set to {}", saved.name);
    Ok(())
}

/// Run the destination command
pub fn run(args: DestinationArgs) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let config = Config::load()?;
    let store = DestinationStore::from_config(&config)?;

    if args.path {
        println!("{}", store.path().display());
        return Ok(());
    }

    if args.clear {
        store.clear()?;
        println!("Destination cleared");
        return Ok(());
    }

    let destination = store.load()?;
    args.output.emit(Report::Destination(&destination), &config)
}
