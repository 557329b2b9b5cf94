//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod destination;
pub mod directions;
pub mod locate;
pub mod output;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::controller::Controller;
use crate::destination::DestinationStore;
use crate::discovery::gemini::GeminiBackend;
use crate::discovery::get_discovery;
use crate::error::Result;
use crate::geo::get_geocoder;
use crate::geo::nominatim::NominatimBackend;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Find a place, see what is popular there, and how long it takes to get there
#[derive(Parser)]
#[command(name = "tour-explore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a place and list popular places around it
    Search(search::SearchArgs),

    /// Show the current position
    Locate(locate::LocateArgs),

    /// Pick a destination for directions
    Select(destination::SelectArgs),

    /// Show or clear the selected destination
    Destination(destination::DestinationArgs),

    /// Travel times to the selected destination
    Directions(directions::DirectionsArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // One-shot commands only report problems unless RUST_LOG says otherwise
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
        Commands::Select(args) => destination::select(args),
        Commands::Destination(args) => destination::run(args),
        Commands::Directions(args) => directions::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` or `default_level`
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Controller wired to the configured services
pub(crate) fn build_controller(config: &Config) -> Result<Controller<NominatimBackend, GeminiBackend>> {
    Ok(Controller::new(
        get_geocoder(config)?,
        get_discovery(config)?,
        DestinationStore::from_config(config)?,
        &config.map,
    ))
}
