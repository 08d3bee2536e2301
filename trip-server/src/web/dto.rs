//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::costs::{self, CostSummary};
use crate::domain::{CostItem, Day, Destination, GeoPoint, Trip};
use crate::guidance::SegmentGuidance;
use crate::routing::RouteState;

/// A trip, fully rendered for the UI.
#[derive(Debug, Serialize)]
pub struct TripView {
    pub name: String,
    pub members: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Display currency for all amounts below.
    pub currency: String,
    pub days: Vec<DayView>,
    pub total: TotalView,
}

impl TripView {
    pub fn from_trip(trip: &Trip, route_states: &[RouteState]) -> TripView {
        TripView {
            name: trip.name.clone(),
            members: trip.members,
            start_date: trip.start_date.map(|d| d.to_string()),
            end_date: trip.end_date.map(|d| d.to_string()),
            currency: trip.currency.as_str().to_string(),
            days: trip
                .days
                .iter()
                .enumerate()
                .map(|(i, day)| {
                    DayView::from_day(
                        day,
                        route_states.get(i).copied().unwrap_or(RouteState::Unoptimized),
                    )
                })
                .collect(),
            total: TotalView::from_summary(costs::trip_total(trip)),
        }
    }
}

/// One day of a trip.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub id: String,
    pub day_number: u32,
    pub destinations: Vec<DestinationView>,
    pub optimized_route: Vec<DestinationView>,
    pub route_state: &'static str,
    pub route_distance_km: Option<f64>,
    pub route_duration_min: Option<f64>,
    pub route_geometry: Option<String>,
    pub total: TotalView,
}

impl DayView {
    pub fn from_day(day: &Day, state: RouteState) -> DayView {
        DayView {
            id: day.id.clone(),
            day_number: day.day_number,
            destinations: day.destinations.iter().map(DestinationView::from_destination).collect(),
            optimized_route: day
                .optimized_route
                .iter()
                .map(DestinationView::from_destination)
                .collect(),
            route_state: match state {
                RouteState::Unoptimized => "unoptimized",
                RouteState::Optimizing => "optimizing",
                RouteState::Optimized => "optimized",
            },
            route_distance_km: day.route_distance_km,
            route_duration_min: day.route_duration_min,
            route_geometry: day.route_geometry.clone(),
            total: TotalView::from_summary(costs::day_total(day)),
        }
    }
}

/// One destination.
#[derive(Debug, Serialize)]
pub struct DestinationView {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub costs: Vec<CostView>,
}

impl DestinationView {
    pub fn from_destination(destination: &Destination) -> DestinationView {
        DestinationView {
            id: destination.id.clone(),
            name: destination.name.clone(),
            address: destination.address.clone(),
            latitude: destination.latitude,
            longitude: destination.longitude,
            costs: destination.costs.iter().map(CostView::from_cost).collect(),
        }
    }
}

/// One cost entry.
#[derive(Debug, Serialize)]
pub struct CostView {
    pub id: String,
    pub detail: String,
    pub amount: String,
    pub original_amount: String,
    pub original_currency: String,
}

impl CostView {
    pub fn from_cost(cost: &CostItem) -> CostView {
        CostView {
            id: cost.id.clone(),
            detail: cost.detail.clone(),
            amount: cost.amount.clone(),
            original_amount: cost.original_amount.clone(),
            original_currency: cost.original_currency.as_str().to_string(),
        }
    }
}

/// Aggregated cost bounds.
#[derive(Debug, Serialize)]
pub struct TotalView {
    pub min: f64,
    pub max: f64,
    pub is_approx: bool,
}

impl TotalView {
    pub fn from_summary(summary: CostSummary) -> TotalView {
        TotalView {
            min: summary.min,
            max: summary.max,
            is_approx: summary.is_approx,
        }
    }
}

/// One resolved guidance segment.
#[derive(Debug, Serialize)]
pub struct GuidanceView {
    pub from: DestinationView,
    pub to: DestinationView,
    /// Decoded leg geometry as `[lat, lon]` pairs.
    pub geometry: Vec<[f64; 2]>,
    pub instructions: Vec<String>,
}

impl GuidanceView {
    pub fn from_segment(segment: &SegmentGuidance) -> GuidanceView {
        GuidanceView {
            from: DestinationView::from_destination(&segment.from),
            to: DestinationView::from_destination(&segment.to),
            geometry: segment.geometry.iter().map(|p| [p.lat, p.lon]).collect(),
            instructions: segment.instructions.clone(),
        }
    }
}

/// A geocoding match.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Request to create a destination within a day.
///
/// Either `query` (free text, forward geocoded) or `lat`/`lon` (map click,
/// reverse geocoded) must be present.
#[derive(Debug, Deserialize)]
pub struct AddDestinationRequest {
    pub query: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Explicit name, overriding whatever the geocoder suggests.
    pub name: Option<String>,
}

/// Request to rename a destination.
#[derive(Debug, Deserialize)]
pub struct RenameDestinationRequest {
    pub name: String,
}

/// Request to enter or edit a cost.
#[derive(Debug, Deserialize)]
pub struct CostRequest {
    #[serde(default)]
    pub detail: String,
    pub amount: String,
    /// Currency of the entered amount; the trip currency when omitted.
    pub currency: Option<String>,
}

/// Request to swap two days.
#[derive(Debug, Deserialize)]
pub struct SwapDaysRequest {
    pub a: String,
    pub b: String,
}

/// Request to optimize a day's route.
#[derive(Debug, Deserialize, Default)]
pub struct OptimizeRequest {
    /// The traveller's position, prepended as a synthetic anchor.
    pub current_location: Option<LatLon>,
    /// Use the local heuristic instead of the routing service.
    #[serde(default)]
    pub local: bool,
}

/// A bare coordinate pair.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Request to switch the display currency.
#[derive(Debug, Deserialize)]
pub struct CurrencyRequest {
    pub currency: String,
}

/// Request naming a saved plan.
#[derive(Debug, Deserialize)]
pub struct PlanNameRequest {
    pub name: String,
}

/// Saved plan listing.
#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<String>,
}

/// Result of saving a plan.
#[derive(Debug, Serialize)]
pub struct SavePlanResponse {
    pub path: String,
}

/// Error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    #[test]
    fn day_view_carries_route_state() {
        let day = Day::new(1);
        let view = DayView::from_day(&day, RouteState::Optimizing);
        assert_eq!(view.route_state, "optimizing");
        assert!(view.optimized_route.is_empty());
    }

    #[test]
    fn trip_view_totals_follow_costs() {
        let usd = Currency::parse("USD").unwrap();
        let mut dest = Destination::new("X", "", 0.0, 0.0, usd);
        let cost_id = dest.costs[0].id.clone();
        dest = dest.update_cost_item(&cost_id, "", "5-10", usd);

        let trip = Trip::new("t", usd);
        let day = trip.days[0].add_destination(dest);
        let trip = trip.with_day_replaced(day);

        let view = TripView::from_trip(&trip, &[RouteState::Unoptimized]);
        assert_eq!(view.total.min, 5.0);
        assert_eq!(view.total.max, 10.0);
        assert!(view.total.is_approx);
    }

    #[test]
    fn optimize_request_defaults() {
        let req: OptimizeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.current_location.is_none());
        assert!(!req.local);
    }
}
