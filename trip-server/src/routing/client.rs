//! Route optimization HTTP client.
//!
//! Talks to the companion services gateway, which fronts the actual
//! routing engine. The request is an ordered JSON array of named
//! coordinates; see [`super::types`] for the shapes.

use std::future::Future;

use tracing::debug;

use super::error::RouteError;
use super::types::{RouteResponse, RouteWaypoint};

/// Default base URL for the services gateway.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Adapter contract for the external route optimization service.
///
/// The optimizer is written against this so tests and offline development
/// can substitute a canned provider for the HTTP client.
pub trait RouteProvider {
    /// Compute an optimal visiting order over the given waypoints.
    fn optimal_route(
        &self,
        waypoints: Vec<RouteWaypoint>,
    ) -> impl Future<Output = Result<RouteResponse, RouteError>> + Send;
}

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Base URL of the services gateway
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RouteConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing or a non-local gateway).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Routing service client.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RouteClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RouteConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Request an optimized visiting order for the given waypoints.
    pub async fn optimize(
        &self,
        waypoints: &[RouteWaypoint],
    ) -> Result<RouteResponse, RouteError> {
        let url = format!("{}/api/route/optimize", self.base_url);

        debug!(waypoints = waypoints.len(), "requesting route optimization");

        let response = self.http.post(&url).json(waypoints).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            // The gateway answers 422 when the engine cannot route the
            // given coordinates (disconnected or invalid points).
            return Err(RouteError::NoRoute);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: RouteResponse =
            serde_json::from_str(&body).map_err(|e| RouteError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if parsed.optimized_route.is_empty() {
            return Err(RouteError::NoRoute);
        }

        Ok(parsed)
    }
}

impl RouteProvider for RouteClient {
    fn optimal_route(
        &self,
        waypoints: Vec<RouteWaypoint>,
    ) -> impl Future<Output = Result<RouteResponse, RouteError>> + Send {
        async move { self.optimize(&waypoints).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = RouteConfig::new()
            .with_base_url("http://localhost:9999")
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = RouteConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        let client = RouteClient::new(RouteConfig::new());
        assert!(client.is_ok());
    }
}
