//! Error types for tour-explore

use thiserror::Error;

/// Main error type for tour-explore operations
#[derive(Error, Debug)]
pub enum Error {
    /// Geocoder returned no match, or a stored record is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure or non-success status from an external service
    #[error("Service error: {0}")]
    Service(String),

    /// Service answered, but the payload could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location information unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    LocationTimeout,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    /// A failure annotated with the notice a flow shows for it
    #[error("{notice}")]
    Notice {
        notice: String,
        #[source]
        cause: Box<Error>,
    },
}

impl Error {
    /// User-facing notice for this failure
    ///
    /// Every flow converts its failure into one of these strings instead of
    /// propagating raw errors to the page.
    pub fn notice(&self) -> String {
        match self {
            Error::PermissionDenied
            | Error::PositionUnavailable
            | Error::LocationTimeout => format!("Error getting location: {}", self),
            Error::Notice { notice, .. } => notice.clone(),
            Error::NotFound(what) => what.clone(),
            Error::InvalidQuery(what) => what.clone(),
            Error::MalformedResponse(_) | Error::Service(_) | Error::Http(_) | Error::Json(_) => {
                "The service is unavailable right now. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Stable machine-readable code, used by the HTTP API
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::Service(_) | Error::Http(_) => "SERVICE_ERROR",
            Error::MalformedResponse(_) | Error::Json(_) => "MALFORMED_RESPONSE",
            Error::PermissionDenied => "PERMISSION_DENIED",
            Error::PositionUnavailable => "POSITION_UNAVAILABLE",
            Error::LocationTimeout => "LOCATION_TIMEOUT",
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidQuery(_) => "INVALID_QUERY",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) | Error::Server(_) => "INTERNAL_ERROR",
            Error::Notice { cause, .. } => cause.code(),
        }
    }

    /// Attach the notice a flow shows for this failure
    pub fn with_notice(self, notice: impl Into<String>) -> Self {
        Error::Notice {
            notice: notice.into(),
            cause: Box::new(self),
        }
    }

    /// The underlying failure, looking through notices
    pub fn root(&self) -> &Error {
        match self {
            Error::Notice { cause, .. } => cause.root(),
            other => other,
        }
    }
}

/// Result type alias for tour-explore operations
pub type Result<T> = std::result::Result<T, Error>;
