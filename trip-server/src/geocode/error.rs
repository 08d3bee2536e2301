//! Geocoding error types.

/// Errors that can occur when interacting with the geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response carried coordinates that do not parse as numbers
    #[error("bad coordinates in response: {message}")]
    BadCoordinates { message: String },
}
