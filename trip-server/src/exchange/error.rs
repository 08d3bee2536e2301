//! Exchange-rate client error types.

use std::fmt;

/// Errors from the currency conversion service.
///
/// All variants are recoverable: callers keep showing the last successfully
/// resolved amounts instead of blanking or zeroing the display.
#[derive(Debug)]
pub enum ExchangeError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// API answered but reported a conversion failure
    Service(String),

    /// API returned a rate or amount that is not a finite number
    BadRate(String),
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Http(e) => write!(f, "HTTP error: {e}"),
            ExchangeError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ExchangeError::Api { status, message } => {
                write!(f, "exchange API error {status}: {message}")
            }
            ExchangeError::Service(message) => {
                write!(f, "exchange service failure: {message}")
            }
            ExchangeError::BadRate(message) => {
                write!(f, "exchange service returned an unusable rate: {message}")
            }
        }
    }
}

impl std::error::Error for ExchangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExchangeError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ExchangeError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "exchange API error 502: Bad Gateway");

        let err = ExchangeError::Service("unknown currency pair".into());
        assert_eq!(
            err.to_string(),
            "exchange service failure: unknown currency pair"
        );

        let err = ExchangeError::Json {
            message: "expected number".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected number"));
    }
}
