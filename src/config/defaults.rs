//! Default configuration values
//!
//! Named constants for all tunable parameters

/// OpenStreetMap raster tiles
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution shown with the default tiles
pub const DEFAULT_TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Tile layer zoom limits
pub const DEFAULT_MIN_ZOOM: f64 = 3.0;
pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

/// Initial whole-world view
pub const DEFAULT_INITIAL_LAT: f64 = 0.0;
pub const DEFAULT_INITIAL_LNG: f64 = 0.0;
pub const DEFAULT_INITIAL_ZOOM: f64 = 2.0;

/// Viewport used for route fitting, in pixels
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

/// Text generation model
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Environment variable overriding the stored Gemini key
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Selected destination file name
pub const DESTINATION_FILE_NAME: &str = "destination.json";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "tour-explore";
