//! Currency conversion HTTP client.
//!
//! Talks to the companion services gateway, which fronts the actual
//! exchange-rate provider. The contract is a single GET endpoint taking
//! `(amount, source, target)` and answering `{ "amount": <number> }` or
//! `{ "error": <message> }`.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Currency;

use super::error::ExchangeError;

/// Default base URL for the services gateway.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default maximum concurrent requests.
///
/// Bulk trip conversion fans out one request per cost item; the semaphore
/// keeps that fan-out from hammering the upstream provider.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Source of currency conversion rates.
///
/// The cost resolver is written against this contract so tests and offline
/// development can substitute a fixed-rate mock for the HTTP client.
pub trait RateProvider {
    /// Convert `amount` from one currency to another.
    fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> impl Future<Output = Result<f64, ExchangeError>> + Send;
}

/// Configuration for the exchange client.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Base URL of the services gateway
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ExchangeConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing or a non-local gateway).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Response from the conversion endpoint.
#[derive(Debug, Deserialize)]
struct ConversionResponse {
    amount: Option<f64>,
    error: Option<String>,
}

/// Currency conversion client.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ExchangeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ExchangeConfig) -> Result<Self, ExchangeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Convert an amount between currencies.
    ///
    /// Same-currency conversions are answered locally without a request.
    pub async fn convert(
        &self,
        amount: f64,
        source: Currency,
        target: Currency,
    ) -> Result<f64, ExchangeError> {
        if source == target {
            return Ok(amount);
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ExchangeError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/api/exchangerate", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("amount", amount.to_string()),
                ("source", source.as_str().to_string()),
                ("target", target.as_str().to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let converted: ConversionResponse =
            serde_json::from_str(&body).map_err(|e| ExchangeError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if let Some(error) = converted.error {
            return Err(ExchangeError::Service(error));
        }

        match converted.amount {
            Some(value) if value.is_finite() => {
                debug!(
                    amount,
                    source = %source,
                    target = %target,
                    converted = value,
                    "converted amount"
                );
                Ok(value)
            }
            Some(value) => Err(ExchangeError::BadRate(format!("non-finite amount {value}"))),
            None => Err(ExchangeError::Json {
                message: "response missing both amount and error".to_string(),
                body: Some(body.chars().take(500).collect()),
            }),
        }
    }
}

impl RateProvider for ExchangeClient {
    fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> impl Future<Output = Result<f64, ExchangeError>> + Send {
        ExchangeClient::convert(self, amount, from, to)
    }
}
