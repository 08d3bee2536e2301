//! Route optimization error types.

use std::fmt;

use crate::domain::ValidationError;

/// Errors from route optimization.
///
/// All variants are recoverable; a day's previously stored route survives
/// any failure because the optimizer only produces a new day value on
/// success.
#[derive(Debug)]
pub enum RouteError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// The service reported that no feasible route exists
    NoRoute,

    /// The response decoded but cannot be matched back to the day's
    /// destinations (wrong count, unknown waypoints, missing fields)
    Malformed(String),

    /// Caller violated an optimization precondition
    Validation(ValidationError),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Http(e) => write!(f, "HTTP error: {e}"),
            RouteError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RouteError::Api { status, message } => {
                write!(f, "routing API error {status}: {message}")
            }
            RouteError::NoRoute => write!(f, "no feasible route between the given points"),
            RouteError::Malformed(message) => {
                write!(f, "unusable optimization response: {message}")
            }
            RouteError::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::Http(e) => Some(e),
            RouteError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        RouteError::Http(err)
    }
}

impl From<ValidationError> for RouteError {
    fn from(err: ValidationError) -> Self {
        RouteError::Validation(err)
    }
}
