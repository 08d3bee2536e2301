//! Cost aggregation and resolution.
//!
//! Aggregation is synchronous and reads display amounts (which the resolver
//! keeps in the trip's display currency); resolution is asynchronous and
//! talks to the exchange-rate provider.

mod resolver;

pub use resolver::{resolve_cost_item, resolve_day, resolve_destination, resolve_trip};

use crate::domain::{Day, Destination, ParsedAmount, Trip};

/// Aggregated min/max cost bounds.
///
/// A single approximate component makes the whole total approximate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostSummary {
    pub min: f64,
    pub max: f64,
    pub is_approx: bool,
}

impl CostSummary {
    /// Fold one parsed amount into the summary.
    fn add(&mut self, parsed: ParsedAmount) {
        self.min += parsed.min;
        self.max += parsed.max;
        self.is_approx |= parsed.is_approx;
    }
}

/// Total cost of one destination, from its display amounts.
pub fn destination_total(destination: &Destination) -> CostSummary {
    let mut total = CostSummary::default();
    for cost in &destination.costs {
        total.add(cost.parsed());
    }
    total
}

/// Total cost of one day.
pub fn day_total(day: &Day) -> CostSummary {
    let mut total = CostSummary::default();
    for destination in &day.destinations {
        for cost in &destination.costs {
            total.add(cost.parsed());
        }
    }
    total
}

/// Total cost of the whole trip.
pub fn trip_total(trip: &Trip) -> CostSummary {
    let mut total = CostSummary::default();
    for day in &trip.days {
        let day_total = day_total(day);
        total.min += day_total.min;
        total.max += day_total.max;
        total.is_approx |= day_total.is_approx;
    }
    total
}
