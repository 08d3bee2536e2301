//! Caching layer for exchange rates.
//!
//! A display-currency toggle converts every cost item in the trip, but the
//! underlying rate is the same for every item sharing a currency pair.
//! Caching the unit rate per (source, target) pair turns a bulk conversion
//! into one upstream call per distinct pair instead of one per cost item.
//! TTL bounds staleness; rates move slowly enough that minutes-old data is
//! fine for trip budgeting.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Currency;
use crate::exchange::{ExchangeClient, ExchangeError, RateProvider};

/// Cache key: (source, target) currency pair.
type RateKey = (Currency, Currency);

/// Configuration for the rate cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached rates.
    pub ttl: Duration,

    /// Maximum number of cached pairs.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Exchange client with rate caching.
///
/// Wraps an `ExchangeClient` and caches unit rates; conversions multiply
/// locally by the cached rate.
pub struct CachedExchangeClient {
    client: ExchangeClient,
    rates: MokaCache<RateKey, f64>,
}

impl CachedExchangeClient {
    /// Create a new cached client.
    pub fn new(client: ExchangeClient, config: &CacheConfig) -> Self {
        let rates = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, rates }
    }

    /// Get the unit rate for a currency pair, fetching on a cache miss.
    pub async fn rate(&self, source: Currency, target: Currency) -> Result<f64, ExchangeError> {
        if source == target {
            return Ok(1.0);
        }

        if let Some(rate) = self.rates.get(&(source, target)).await {
            return Ok(rate);
        }

        // Unit conversion gives the rate directly.
        let rate = self.client.convert(1.0, source, target).await?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ExchangeError::BadRate(format!(
                "unit rate {rate} for {source}->{target}"
            )));
        }

        self.rates.insert((source, target), rate).await;
        Ok(rate)
    }

    /// Convert an amount using the cached rate.
    pub async fn convert(
        &self,
        amount: f64,
        source: Currency,
        target: Currency,
    ) -> Result<f64, ExchangeError> {
        let rate = self.rate(source, target).await?;
        Ok(amount * rate)
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &ExchangeClient {
        &self.client
    }

    /// Number of cached pairs.
    pub fn cached_pairs(&self) -> u64 {
        self.rates.entry_count()
    }

    /// Drop all cached rates.
    pub fn invalidate_all(&self) {
        self.rates.invalidate_all();
    }
}

impl RateProvider for CachedExchangeClient {
    fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> impl Future<Output = Result<f64, ExchangeError>> + Send {
        CachedExchangeClient::convert(self, amount, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeConfig;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn starts_empty() {
        let client = ExchangeClient::new(ExchangeConfig::new()).unwrap();
        let cached = CachedExchangeClient::new(client, &CacheConfig::default());
        assert_eq!(cached.cached_pairs(), 0);
    }

    #[tokio::test]
    async fn identity_rate_is_one_without_network() {
        let client =
            ExchangeClient::new(ExchangeConfig::new().with_base_url("http://127.0.0.1:1"))
                .unwrap();
        let cached = CachedExchangeClient::new(client, &CacheConfig::default());
        let usd = Currency::parse("USD").unwrap();

        assert_eq!(cached.rate(usd, usd).await.unwrap(), 1.0);
        assert_eq!(cached.convert(3.5, usd, usd).await.unwrap(), 3.5);
    }
}
