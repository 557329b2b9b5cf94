//! Centralized constants for the tour-explore crate
//!
//! Values here are fixed behavior, not user configuration. Tunables live in
//! `config::defaults`.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Label used when reverse geocoding a device position fails
    pub const PLACEHOLDER_LABEL: &str = "Your Location";
}

/// Travel speeds used by the straight-line estimator, in km/h
pub mod speed {
    pub const CAR_KMH: f64 = 50.0;
    pub const BIKE_KMH: f64 = 15.0;
    pub const WALK_KMH: f64 = 5.0;
    pub const TRAIN_KMH: f64 = 40.0;
}

/// Device location watch policy
pub mod location {
    /// A reading at or below this accuracy (meters) ends the watch immediately
    pub const HIGH_ACCURACY_METERS: f64 = 100.0;

    /// How long to wait for a high-accuracy reading before settling
    pub const WATCH_WINDOW_SECS: u64 = 15;

    /// Nominal accuracy reported for IP-based positions
    pub const IP_ACCURACY_METERS: f64 = 5000.0;
}

/// Map overlay and viewport behavior
pub mod map {
    /// Padding applied on both axes when fitting a route
    pub const ROUTE_PADDING_PX: f64 = 50.0;

    /// Zoom used when focusing a searched or located place
    pub const FOCUS_ZOOM: f64 = 14.0;

    /// Radius of the circle drawn around a focused place
    pub const ACCURACY_CIRCLE_METERS: f64 = 300.0;

    /// Web Mercator tile size
    pub const TILE_SIZE_PX: f64 = 256.0;

    /// Marker labels keep this many comma-separated address parts
    pub const LABEL_PARTS: usize = 3;
}

/// Place discovery
pub mod discovery {
    /// Number of places requested and returned per search
    pub const PLACE_COUNT: usize = 5;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Generative Language API root
    pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}
