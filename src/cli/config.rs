//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "discovery.model")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Available keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        },

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[map]");
    println!("tile_url = \"{}\"", config.map.tile_url);
    println!("attribution = \"{}\"", config.map.attribution);
    println!("min_zoom = {}", config.map.min_zoom);
    println!("max_zoom = {}", config.map.max_zoom);
    println!("initial_lat = {}", config.map.initial_lat);
    println!("initial_lng = {}", config.map.initial_lng);
    println!("initial_zoom = {}", config.map.initial_zoom);
    println!("viewport_width = {}", config.map.viewport_width);
    println!("viewport_height = {}", config.map.viewport_height);
    println!();

    println!("[geocoding]");
    println!("base_url = \"{}\"", config.geocoding.base_url);
    println!("user_agent = \"{}\"", config.geocoding.user_agent);
    println!();

    println!("[discovery]");
    println!("base_url = \"{}\"", config.discovery.base_url);
    println!("model = \"{}\"", config.discovery.model);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        println!("{} = \"{}\"", name, template);
    }
    println!();

    println!("[storage]");
    match &config.storage.destination_path {
        Some(path) => println!("destination_path = \"{}\"", path.display()),
        None => println!("destination_path = \"\" # default data directory"),
    }
    println!();

    println!("[api_keys]");
    if config.api_keys.gemini.is_empty() {
        if config.gemini_api_key().is_some() {
            println!("gemini = \"\" # set via GEMINI_API_KEY");
        } else {
            println!("gemini = \"\" # not configured");
        }
    } else {
        println!("gemini = \"***\" # configured");
    }
}
