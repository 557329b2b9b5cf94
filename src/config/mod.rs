//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/tour-explore/config.toml

pub mod defaults;

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::map::TileLayer;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base map and viewport
    #[serde(default)]
    pub map: MapConfig,

    /// Geocoding service
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Place discovery service
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,

    /// Where persisted state lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Base map and viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,

    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    #[serde(default = "default_initial_lat")]
    pub initial_lat: f64,

    #[serde(default = "default_initial_lng")]
    pub initial_lng: f64,

    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,

    /// Pixel size assumed when fitting routes
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

/// Geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim-compatible API root
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,

    /// Nominatim requires an identifying User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Place discovery service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Generative Language API root
    #[serde(default = "default_discovery_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// Persisted state locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected destination record; the XDG data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<PathBuf>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Generative Language API key
    #[serde(default)]
    pub gemini: String,
}

// Default value functions for serde
fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_string()
}
fn default_attribution() -> String {
    DEFAULT_TILE_ATTRIBUTION.to_string()
}
fn default_min_zoom() -> f64 {
    DEFAULT_MIN_ZOOM
}
fn default_max_zoom() -> f64 {
    DEFAULT_MAX_ZOOM
}
fn default_initial_lat() -> f64 {
    DEFAULT_INITIAL_LAT
}
fn default_initial_lng() -> f64 {
    DEFAULT_INITIAL_LNG
}
fn default_initial_zoom() -> f64 {
    DEFAULT_INITIAL_ZOOM
}
fn default_viewport_width() -> f64 {
    DEFAULT_VIEWPORT_WIDTH
}
fn default_viewport_height() -> f64 {
    DEFAULT_VIEWPORT_HEIGHT
}
fn default_geocoding_url() -> String {
    crate::constants::api::NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    crate::geo::nominatim::USER_AGENT.to_string()
}
fn default_discovery_url() -> String {
    crate::constants::api::GEMINI_URL.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},15z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=14/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            initial_lat: default_initial_lat(),
            initial_lng: default_initial_lng(),
            initial_zoom: default_initial_zoom(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            base_url: default_discovery_url(),
            model: default_model(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl MapConfig {
    /// Initial camera center; out-of-range values are clamped
    pub fn initial_center(&self) -> Coordinate {
        Coordinate::clamped(self.initial_lat, self.initial_lng)
    }

    pub fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url.clone(),
            attribution: self.attribution.clone(),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom.max(self.min_zoom),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Gemini key, with `GEMINI_API_KEY` taking precedence over the file
    pub fn gemini_api_key(&self) -> Option<String> {
        Self::pick_key(std::env::var(GEMINI_KEY_ENV).ok(), &self.api_keys.gemini)
    }

    fn pick_key(env_value: Option<String>, stored: &str) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(stored.to_string()).filter(|k| !k.trim().is_empty()))
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "tile_url"] => Some(self.map.tile_url.clone()),
            ["map", "attribution"] => Some(self.map.attribution.clone()),
            ["map", "min_zoom"] => Some(self.map.min_zoom.to_string()),
            ["map", "max_zoom"] => Some(self.map.max_zoom.to_string()),
            ["map", "initial_lat"] => Some(self.map.initial_lat.to_string()),
            ["map", "initial_lng"] => Some(self.map.initial_lng.to_string()),
            ["map", "initial_zoom"] => Some(self.map.initial_zoom.to_string()),
            ["map", "viewport_width"] => Some(self.map.viewport_width.to_string()),
            ["map", "viewport_height"] => Some(self.map.viewport_height.to_string()),

            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "user_agent"] => Some(self.geocoding.user_agent.clone()),

            ["discovery", "base_url"] => Some(self.discovery.base_url.clone()),
            ["discovery", "model"] => Some(self.discovery.model.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["storage", "destination_path"] => Some(
                self.storage
                    .destination_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),

            ["api_keys", "gemini"] => Some(self.api_keys.gemini.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "tile_url"] => self.map.tile_url = value.to_string(),
            ["map", "attribution"] => self.map.attribution = value.to_string(),
            ["map", "min_zoom"] => self.map.min_zoom = parse_number(key, value)?,
            ["map", "max_zoom"] => self.map.max_zoom = parse_number(key, value)?,
            ["map", "initial_lat"] => self.map.initial_lat = parse_number(key, value)?,
            ["map", "initial_lng"] => self.map.initial_lng = parse_number(key, value)?,
            ["map", "initial_zoom"] => self.map.initial_zoom = parse_number(key, value)?,
            ["map", "viewport_width"] => self.map.viewport_width = parse_number(key, value)?,
            ["map", "viewport_height"] => self.map.viewport_height = parse_number(key, value)?,

            ["geocoding", "base_url"] => self.geocoding.base_url = value.to_string(),
            ["geocoding", "user_agent"] => self.geocoding.user_agent = value.to_string(),

            ["discovery", "base_url"] => self.discovery.base_url = value.to_string(),
            ["discovery", "model"] => self.discovery.model = value.to_string(),

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["url", "default"] => {
                if !self.url.providers.contains_key(value) {
                    return Err(Error::Config(format!("Unknown URL provider: {}", value)));
                }
                self.url.default = value.to_string();
            }

            ["storage", "destination_path"] => {
                self.storage.destination_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }

            ["api_keys", "gemini"] => self.api_keys.gemini = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "map.tile_url",
            "map.attribution",
            "map.min_zoom",
            "map.max_zoom",
            "map.initial_lat",
            "map.initial_lng",
            "map.initial_zoom",
            "map.viewport_width",
            "map.viewport_height",
            "geocoding.base_url",
            "geocoding.user_agent",
            "discovery.base_url",
            "discovery.model",
            "server.host",
            "server.port",
            "url.default",
            "storage.destination_path",
            "api_keys.gemini",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self
            .url
            .providers
            .get(provider_name)
            .ok_or_else(|| Error::Config(format!("Unknown URL provider: {}", provider_name)))?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Config(format!("Invalid number for {}: {}", key, value)))
}
