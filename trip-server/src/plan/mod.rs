//! Persisted trip plans.
//!
//! The plan format is the shape exchanged with the storage collaborator:
//! structural keys in snake_case, cost keys in camelCase, destination
//! order as an explicit field. Optimized routes are never persisted; a
//! loaded trip always starts unoptimized.

mod store;

pub use store::{PlanStore, PlanStoreError};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{CostItem, Currency, Day, Destination, InvalidCurrency, ParsedAmount, Trip};

/// A persisted trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub name: String,
    #[serde(default)]
    pub members: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub currency: String,
    pub days: Vec<DayPlan>,
}

/// One persisted day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_number: u32,
    pub destinations: Vec<DestinationPlan>,
}

/// One persisted destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationPlan {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Position within the day; non-negative, unique within a day.
    pub order: u32,
    #[serde(default)]
    pub costs: Vec<CostPlan>,
}

/// One persisted cost entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostPlan {
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(rename = "originalAmount", default, deserialize_with = "opt_string_or_number")]
    pub original_amount: Option<String>,
    #[serde(rename = "originalCurrency", default)]
    pub original_currency: Option<String>,
    #[serde(default)]
    pub detail: String,
}

/// Amounts appear both as JSON strings ("10-20") and as plain numbers in
/// older plans; both are accepted and normalized to the string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => ParsedAmount::exact(n).to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => ParsedAmount::exact(n).to_string(),
    }))
}

impl TripPlan {
    /// Serialize a trip into its persisted shape.
    pub fn from_trip(trip: &Trip) -> TripPlan {
        TripPlan {
            name: trip.name.clone(),
            members: trip.members,
            start_date: trip.start_date,
            end_date: trip.end_date,
            currency: trip.currency.as_str().to_string(),
            days: trip
                .days
                .iter()
                .map(|day| DayPlan {
                    day_number: day.day_number,
                    destinations: day
                        .destinations
                        .iter()
                        .enumerate()
                        .map(|(index, dest)| DestinationPlan {
                            name: dest.name.clone(),
                            address: dest.address.clone(),
                            latitude: Some(dest.latitude),
                            longitude: Some(dest.longitude),
                            order: index as u32,
                            costs: dest
                                .costs
                                .iter()
                                .map(|cost| CostPlan {
                                    amount: cost.amount.clone(),
                                    original_amount: Some(cost.original_amount.clone()),
                                    original_currency: Some(
                                        cost.original_currency.as_str().to_string(),
                                    ),
                                    detail: cost.detail.clone(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Reconstruct a trip from its persisted shape.
    ///
    /// Days are renumbered contiguously in `day_number` order and
    /// destinations sorted by `order`, so a plan whose numbering drifted
    /// still loads into a consistent tree. Cost entries with no usable
    /// original fall back to the entered amount and the trip currency.
    pub fn to_trip(&self) -> Result<Trip, InvalidCurrency> {
        let currency = Currency::parse_normalized(&self.currency)?;

        let mut day_plans: Vec<&DayPlan> = self.days.iter().collect();
        day_plans.sort_by_key(|d| d.day_number);

        let mut days: Vec<Day> = Vec::with_capacity(day_plans.len().max(1));
        for (index, day_plan) in day_plans.iter().enumerate() {
            let mut day = Day::new(index as u32 + 1);

            let mut dest_plans: Vec<&DestinationPlan> = day_plan.destinations.iter().collect();
            dest_plans.sort_by_key(|d| d.order);

            for dest_plan in dest_plans {
                day = day.add_destination(dest_plan.to_destination(currency));
            }
            days.push(day);
        }

        if days.is_empty() {
            days.push(Day::new(1));
        }

        Ok(Trip {
            name: self.name.clone(),
            members: self.members,
            start_date: self.start_date,
            end_date: self.end_date,
            currency,
            days,
        })
    }
}

impl DestinationPlan {
    fn to_destination(&self, trip_currency: Currency) -> Destination {
        let mut dest = Destination::new(
            self.name.clone(),
            self.address.clone(),
            self.latitude.unwrap_or(0.0),
            self.longitude.unwrap_or(0.0),
            trip_currency,
        );

        let costs: Vec<CostItem> = self
            .costs
            .iter()
            .map(|cost_plan| {
                let original_currency = cost_plan
                    .original_currency
                    .as_deref()
                    .and_then(|c| Currency::parse_normalized(c).ok())
                    .unwrap_or(trip_currency);
                let original_amount = cost_plan
                    .original_amount
                    .clone()
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| cost_plan.amount.clone());

                let mut cost =
                    CostItem::new(cost_plan.detail.clone(), original_amount, original_currency);
                cost.amount = cost_plan.amount.clone();
                cost
            })
            .collect();

        if !costs.is_empty() {
            dest.costs = costs;
        }
        dest
    }
}
