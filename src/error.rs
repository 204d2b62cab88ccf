use thiserror::Error;

/// Result type for thermostat operations
pub type Result<T> = std::result::Result<T, RadiothermError>;

/// Errors that can occur when interacting with thermostats
#[derive(Error, Debug)]
pub enum RadiothermError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The thermostat reported an application-level error
    #[error("thermostat API error: {detail}")]
    Api {
        /// Error detail message from the device
        detail: String,
    },

    /// Invalid or unexpected response from the device
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Auto-discovery found more than one thermostat and cannot pick one.
    /// Pass an explicit address to disambiguate.
    #[error("found {count} thermostats on the network and cannot choose between them; pass an explicit address")]
    MultipleThermostatsFound {
        /// Number of thermostats discovered
        count: usize,
    },

    /// Auto-discovery found no thermostats on the network
    #[error("no thermostats found on the network")]
    NoThermostatsFound,

    /// The field is not available on this thermostat model
    #[error("field '{field}' is not supported by model {model}")]
    UnsupportedField {
        /// Name of the requested field
        field: &'static str,
        /// Model identifier of the thermostat
        model: &'static str,
    },
}
