//! Mock exchange client for testing without a live rate service.

use std::collections::HashMap;
use std::future::Future;

use crate::domain::Currency;

use super::client::RateProvider;
use super::error::ExchangeError;

/// Rate provider backed by a fixed table.
///
/// Rates are stored per ordered pair; adding a rate also adds its inverse,
/// so a table seeded with USD→VND answers VND→USD too. Conversions for
/// pairs not in the table fail, which doubles as a way to exercise failure
/// paths in tests.
#[derive(Debug, Clone, Default)]
pub struct MockExchangeClient {
    rates: HashMap<(Currency, Currency), f64>,
}

impl MockExchangeClient {
    /// An empty table: every non-identity conversion fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate (and its inverse) for a currency pair.
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        if rate != 0.0 {
            self.rates.insert((to, from), 1.0 / rate);
        }
        self
    }

    async fn convert_inner(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> Result<f64, ExchangeError> {
        if from == to {
            return Ok(amount);
        }
        match self.rates.get(&(from, to)) {
            Some(rate) => Ok(amount * rate),
            None => Err(ExchangeError::Service(format!(
                "no rate configured for {from}->{to}"
            ))),
        }
    }
}

impl RateProvider for MockExchangeClient {
    fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> impl Future<Output = Result<f64, ExchangeError>> + Send {
        self.convert_inner(amount, from, to)
    }
}
