//! Days: one calendar day of a trip.

use super::destination::Destination;

/// One day of a trip, holding ordered destinations and, optionally, a
/// computed visiting order with its route metrics.
///
/// `id` and `day_number` are both 1-based and always equal to the day's
/// position within the trip; [`crate::domain::Trip`] recomputes them on
/// every structural change to its day list.
///
/// `optimized_route`, when non-empty, is a permutation of `destinations`
/// (same ids). Any structural edit to `destinations` clears the route and
/// all route metrics, because position-derived metrics would otherwise go
/// stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    /// Positional identifier, `"1"`..`"N"`.
    pub id: String,
    /// 1-based position within the trip.
    pub day_number: u32,
    pub destinations: Vec<Destination>,
    /// Computed visiting order; empty when not optimized.
    pub optimized_route: Vec<Destination>,
    pub route_distance_km: Option<f64>,
    pub route_duration_min: Option<f64>,
    /// Encoded polyline for the whole route.
    pub route_geometry: Option<String>,
    /// Turn-by-turn instructions, one list per segment.
    pub route_instructions: Vec<Vec<String>>,
    /// Encoded polyline per segment.
    pub route_segment_geometries: Vec<String>,
}

impl Day {
    /// Create an empty day at the given 1-based position.
    pub fn new(number: u32) -> Self {
        Self {
            id: number.to_string(),
            day_number: number,
            destinations: Vec::new(),
            optimized_route: Vec::new(),
            route_distance_km: None,
            route_duration_min: None,
            route_geometry: None,
            route_instructions: Vec::new(),
            route_segment_geometries: Vec::new(),
        }
    }

    /// Re-derive `id` and `day_number` from a new position.
    pub(crate) fn renumbered(mut self, number: u32) -> Self {
        self.id = number.to_string();
        self.day_number = number;
        self
    }

    /// Returns a copy with the destination appended and the route cleared.
    pub fn add_destination(&self, destination: Destination) -> Day {
        let mut next = self.cleared_route();
        next.destinations.push(destination);
        next
    }

    /// Returns a copy without the named destination and with the route
    /// cleared. Removing an unknown id still clears the route.
    pub fn remove_destination(&self, destination_id: &str) -> Day {
        let mut next = self.cleared_route();
        next.destinations.retain(|d| d.id != destination_id);
        next
    }

    /// Returns a copy with the named destination renamed.
    ///
    /// Renames clear the optimized route too: the external optimizer
    /// correlates waypoints by name, so a stored route could no longer be
    /// matched against the renamed set.
    pub fn rename_destination(&self, destination_id: &str, name: impl Into<String>) -> Day {
        let name = name.into();
        let mut next = self.cleared_route();
        for dest in &mut next.destinations {
            if dest.id == destination_id {
                dest.name = name;
                break;
            }
        }
        next
    }

    /// Returns a copy with one destination replaced by id.
    ///
    /// This is the write-back path for cost edits, which do not change the
    /// destination set and therefore keep the optimized route. The route's
    /// copy of the destination is refreshed so both views stay identical.
    pub fn with_destination_replaced(&self, destination: Destination) -> Day {
        let mut next = self.clone();
        for dest in &mut next.destinations {
            if dest.id == destination.id {
                *dest = destination.clone();
            }
        }
        for dest in &mut next.optimized_route {
            if dest.id == destination.id {
                *dest = destination.clone();
            }
        }
        next
    }

    /// Returns a copy carrying an optimized route and its metrics.
    #[allow(clippy::too_many_arguments)]
    pub fn with_route(
        &self,
        route: Vec<Destination>,
        distance_km: Option<f64>,
        duration_min: Option<f64>,
        geometry: Option<String>,
        instructions: Vec<Vec<String>>,
        segment_geometries: Vec<String>,
    ) -> Day {
        let mut next = self.clone();
        next.optimized_route = route;
        next.route_distance_km = distance_km;
        next.route_duration_min = duration_min;
        next.route_geometry = geometry;
        next.route_instructions = instructions;
        next.route_segment_geometries = segment_geometries;
        next
    }

    /// Returns a copy with the optimized route and all metrics dropped.
    pub fn cleared_route(&self) -> Day {
        self.with_route(Vec::new(), None, None, None, Vec::new(), Vec::new())
    }

    /// Look up a destination by id.
    pub fn destination(&self, destination_id: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == destination_id)
    }

    /// True when an optimized route is present.
    pub fn has_route(&self) -> bool {
        !self.optimized_route.is_empty()
    }

    /// Number of segments in the optimized route (N destinations, N-1 legs).
    pub fn segment_count(&self) -> usize {
        self.optimized_route.len().saturating_sub(1)
    }
}
