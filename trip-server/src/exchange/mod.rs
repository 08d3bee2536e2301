//! Currency conversion service client.
//!
//! The conversion contract is a single request/response pair with no
//! server-side state: `(amount, source, target)` in, `{ amount }` out.
//! `RateProvider` is the seam the cost resolver is written against, with
//! the HTTP client, the cached wrapper (see [`crate::cache`]) and a
//! fixed-table mock all implementing it.

mod client;
mod error;
mod mock;

pub use client::{ExchangeClient, ExchangeConfig, RateProvider};
pub use error::ExchangeError;
pub use mock::MockExchangeClient;
