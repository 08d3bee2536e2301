//! Cost resolution: deriving display amounts from original entries.
//!
//! Every cost item keeps the amount the traveller actually entered
//! (`original_amount` + `original_currency`); the display amount is a pure
//! derivation from that, so resolving is idempotent and repeated currency
//! toggles never accumulate drift.

use futures::future::{try_join, try_join_all};
use tracing::debug;

use crate::domain::{CostItem, Currency, Day, Destination, ParsedAmount, Trip};
use crate::exchange::{ExchangeError, RateProvider};

/// Re-derive one cost item's display amount in the given currency.
///
/// Always converts from the stored original, never from a previously
/// converted display value. When the original is already in the display
/// currency the entered text is kept verbatim.
pub async fn resolve_cost_item<P: RateProvider + Sync>(
    item: &CostItem,
    display: Currency,
    provider: &P,
) -> Result<CostItem, ExchangeError> {
    let mut next = item.clone();

    if item.original_currency == display {
        next.amount = item.original_amount.clone();
        return Ok(next);
    }

    let parsed = item.parsed_original();
    let converted = if parsed.min == parsed.max {
        let value = provider
            .convert(parsed.min, item.original_currency, display)
            .await?;
        ParsedAmount {
            min: value,
            max: value,
            is_approx: parsed.is_approx,
        }
    } else {
        let (min, max) = try_join(
            provider.convert(parsed.min, item.original_currency, display),
            provider.convert(parsed.max, item.original_currency, display),
        )
        .await?;
        ParsedAmount {
            min,
            max,
            is_approx: parsed.is_approx,
        }
    };

    next.amount = converted.to_string();
    Ok(next)
}

/// Resolve every cost of a destination; fails as a whole if any item fails.
pub async fn resolve_destination<P: RateProvider + Sync>(
    destination: &Destination,
    display: Currency,
    provider: &P,
) -> Result<Destination, ExchangeError> {
    let costs = try_join_all(
        destination
            .costs
            .iter()
            .map(|c| resolve_cost_item(c, display, provider)),
    )
    .await?;

    let mut next = destination.clone();
    next.costs = costs;
    Ok(next)
}

/// Resolve every cost of a day; fails as a whole if any item fails.
///
/// The optimized route holds copies of the day's destinations, so it is
/// rebuilt from the resolved list to keep both views identical.
pub async fn resolve_day<P: RateProvider + Sync>(
    day: &Day,
    display: Currency,
    provider: &P,
) -> Result<Day, ExchangeError> {
    let destinations = try_join_all(
        day.destinations
            .iter()
            .map(|d| resolve_destination(d, display, provider)),
    )
    .await?;

    let optimized_route = day
        .optimized_route
        .iter()
        .filter_map(|r| destinations.iter().find(|d| d.id == r.id).cloned())
        .collect();

    let mut next = day.clone();
    next.destinations = destinations;
    next.optimized_route = optimized_route;
    Ok(next)
}

/// Resolve an entire trip into a new display currency.
///
/// All per-item conversions run concurrently and the operation is
/// all-or-nothing: any failure leaves the caller's trip untouched, so a
/// half-converted mixed-currency total can never be shown.
pub async fn resolve_trip<P: RateProvider + Sync>(
    trip: &Trip,
    target: Currency,
    provider: &P,
) -> Result<Trip, ExchangeError> {
    let days = try_join_all(trip.days.iter().map(|d| resolve_day(d, target, provider))).await?;

    debug!(currency = %target, days = days.len(), "resolved trip costs");

    let mut next = trip.clone();
    next.days = days;
    next.currency = target;
    Ok(next)
}
