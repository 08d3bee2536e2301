//! Route optimization over a day's destinations.
//!
//! Two paths produce a visiting order: a local nearest-neighbour heuristic
//! over great-circle distance (no metrics, always available), and the
//! external routing service (full metrics, geometry and instructions).
//! Both only ever produce a *new* day value on success, so a failed
//! optimization leaves the caller's day, and any previously stored route,
//! untouched.

use tracing::debug;

use crate::domain::{Day, Destination, GeoPoint, ValidationError};

use super::client::RouteProvider;
use super::error::RouteError;
use super::types::{RoutedPlace, RouteWaypoint};

/// Name given to the traveller's position when it anchors a request.
///
/// The anchor is synthetic: it is sent to the routing service but never
/// stored as a destination, and it is filtered back out of the response.
pub const CURRENT_LOCATION_NAME: &str = "Current location";

/// Optimization lifecycle of a day.
///
/// A day value is either unoptimized (empty route) or optimized; the
/// `Optimizing` state is the in-flight window tracked by the caller while
/// a request is outstanding. Any destination-set change forces a day back
/// to `Unoptimized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    Unoptimized,
    Optimizing,
    Optimized,
}

impl RouteState {
    /// Derive the state of a day, given whether a request is in flight.
    pub fn of(day: &Day, in_flight: bool) -> RouteState {
        if in_flight {
            RouteState::Optimizing
        } else if day.has_route() {
            RouteState::Optimized
        } else {
            RouteState::Unoptimized
        }
    }
}

/// Greedy nearest-neighbour visiting order.
///
/// Starts from the first destination and repeatedly visits the closest
/// remaining one by great-circle distance; ties keep first-seen order.
/// Two or fewer destinations come back in input order, since reordering
/// cannot improve them.
pub fn nearest_neighbor_order(destinations: &[Destination]) -> Vec<Destination> {
    if destinations.len() <= 2 {
        return destinations.to_vec();
    }

    let mut ordered: Vec<Destination> = vec![destinations[0].clone()];
    let mut remaining: Vec<Destination> = destinations[1..].to_vec();

    while !remaining.is_empty() {
        let current = ordered.last().unwrap().point();

        let mut nearest = 0;
        let mut min_distance = current.haversine_km(&remaining[0].point());
        for (i, candidate) in remaining.iter().enumerate().skip(1) {
            let distance = current.haversine_km(&candidate.point());
            if distance < min_distance {
                min_distance = distance;
                nearest = i;
            }
        }

        ordered.push(remaining.remove(nearest));
    }

    ordered
}

/// Optimize a day locally with the nearest-neighbour heuristic.
///
/// The local path records no metrics: there is no road network behind it,
/// only straight-line distance.
pub fn optimize_day_local(day: &Day) -> Result<Day, RouteError> {
    if day.destinations.len() < 2 {
        return Err(ValidationError::InsufficientDestinations.into());
    }

    let ordered = nearest_neighbor_order(&day.destinations);
    Ok(day.with_route(ordered, None, None, None, Vec::new(), Vec::new()))
}

/// Optimize a day through the external routing service.
///
/// `current_location`, when given, is prepended as a synthetic anchor so
/// the order starts from wherever the traveller is. With an anchor one
/// destination suffices; without one at least two are required.
pub async fn optimize_day<P: RouteProvider + Sync>(
    day: &Day,
    current_location: Option<GeoPoint>,
    provider: &P,
) -> Result<Day, RouteError> {
    let anchored = current_location.is_some();
    if day.destinations.is_empty() || (!anchored && day.destinations.len() < 2) {
        return Err(ValidationError::InsufficientDestinations.into());
    }

    let mut waypoints = Vec::with_capacity(day.destinations.len() + 1);
    if let Some(location) = current_location {
        waypoints.push(RouteWaypoint::new(
            location.lat,
            location.lon,
            CURRENT_LOCATION_NAME,
        ));
    }
    waypoints.extend(
        day.destinations
            .iter()
            .map(|d| RouteWaypoint::new(d.latitude, d.longitude, d.name.clone())),
    );

    let response = provider.optimal_route(waypoints).await?;

    if !response.distance_km.is_finite() || !response.duration_min.is_finite() {
        return Err(RouteError::Malformed(format!(
            "non-finite metrics: {} km, {} min",
            response.distance_km, response.duration_min
        )));
    }

    let (ordered, anchor_seen) = match_places(&response.optimized_route, &day.destinations)?;

    // The response's first leg runs from the anchor to the first real
    // destination; with the anchor excluded from the stored route, that
    // leg's instructions and geometry have no segment to hang off.
    let mut instructions = response.instructions;
    let mut segment_geometries = response.segment_geometries;
    if anchor_seen {
        if !instructions.is_empty() {
            instructions.remove(0);
        }
        if !segment_geometries.is_empty() {
            segment_geometries.remove(0);
        }
    }

    debug!(
        destinations = ordered.len(),
        distance_km = response.distance_km,
        duration_min = response.duration_min,
        "route optimized"
    );

    Ok(day.with_route(
        ordered,
        Some(response.distance_km),
        Some(response.duration_min),
        response.geometry,
        instructions,
        segment_geometries,
    ))
}

/// Match the response's visiting order back onto the day's destinations.
///
/// Waypoints come back with the names and coordinates we sent, so identity
/// is re-established by name (nearest wins among duplicates) with a
/// nearest-coordinate fallback. The result must be a full permutation of
/// the destination list; anything else is a malformed response.
fn match_places(
    places: &[RoutedPlace],
    destinations: &[Destination],
) -> Result<(Vec<Destination>, bool), RouteError> {
    let mut used = vec![false; destinations.len()];
    let mut ordered = Vec::with_capacity(destinations.len());
    let mut anchor_seen = false;

    for place in places {
        if place.name == CURRENT_LOCATION_NAME {
            anchor_seen = true;
            continue;
        }

        let index = best_match(place, destinations, &used).ok_or_else(|| {
            RouteError::Malformed(format!(
                "waypoint {:?} does not match any destination",
                place.name
            ))
        })?;
        used[index] = true;
        ordered.push(destinations[index].clone());
    }

    if ordered.len() != destinations.len() {
        return Err(RouteError::Malformed(format!(
            "route has {} waypoints for {} destinations",
            ordered.len(),
            destinations.len()
        )));
    }

    Ok((ordered, anchor_seen))
}

fn best_match(place: &RoutedPlace, destinations: &[Destination], used: &[bool]) -> Option<usize> {
    let nearest = |same_name: bool| -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, dest) in destinations.iter().enumerate() {
            if used[i] || (same_name && dest.name != place.name) {
                continue;
            }
            let distance = dest.point().haversine_km(&place.point());
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| i)
    };

    nearest(true).or_else(|| nearest(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;
    use crate::routing::MockRouteClient;
    use crate::routing::types::RouteResponse;
    use std::future::Future;

    fn usd() -> Currency {
        Currency::parse("USD").unwrap()
    }

    fn dest(name: &str, lat: f64, lon: f64) -> Destination {
        Destination::new(name, "", lat, lon, usd())
    }

    fn triangle_day() -> Day {
        Day::new(1)
            .add_destination(dest("A", 0.0, 0.0))
            .add_destination(dest("C", 1.0, 1.0))
            .add_destination(dest("B", 0.0, 1.0))
    }

    #[test]
    fn identity_for_two_or_fewer() {
        let one = vec![dest("A", 0.0, 0.0)];
        assert_eq!(nearest_neighbor_order(&one), one);

        let two = vec![dest("B", 5.0, 5.0), dest("A", 0.0, 0.0)];
        assert_eq!(nearest_neighbor_order(&two), two);
    }

    #[test]
    fn visits_nearest_first() {
        // From A(0,0): B(0,1) is ~111 km, C(1,1) is ~157 km.
        let input = vec![dest("A", 0.0, 0.0), dest("C", 1.0, 1.0), dest("B", 0.0, 1.0)];
        let ordered = nearest_neighbor_order(&input);

        let names: Vec<&str> = ordered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        // Both candidates sit one degree of longitude from A, on opposite
        // sides: identical distance, so input order decides.
        let input = vec![
            dest("A", 0.0, 0.0),
            dest("East", 0.0, 1.0),
            dest("West", 0.0, -1.0),
        ];
        let ordered = nearest_neighbor_order(&input);
        let names: Vec<&str> = ordered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "East", "West"]);
    }

    #[test]
    fn always_a_permutation() {
        let input: Vec<Destination> = (0..7)
            .map(|i| dest(&format!("D{i}"), i as f64 * 3.7 % 5.0, (i * i) as f64 % 9.0))
            .collect();
        let ordered = nearest_neighbor_order(&input);

        assert_eq!(ordered.len(), input.len());
        for d in &input {
            assert_eq!(ordered.iter().filter(|o| o.id == d.id).count(), 1);
        }
    }

    #[test]
    fn local_optimization_sets_route_without_metrics() {
        let day = triangle_day();
        let optimized = optimize_day_local(&day).unwrap();

        let names: Vec<&str> = optimized
            .optimized_route
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(optimized.segment_count(), 2);
        assert_eq!(optimized.route_distance_km, None);
        assert_eq!(optimized.route_duration_min, None);
    }

    #[test]
    fn local_optimization_requires_two_destinations() {
        let day = Day::new(1).add_destination(dest("A", 0.0, 0.0));
        let err = optimize_day_local(&day).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Validation(ValidationError::InsufficientDestinations)
        ));
    }

    #[tokio::test]
    async fn remote_optimization_applies_result() {
        let day = triangle_day();
        let optimized = optimize_day(&day, None, &MockRouteClient::new())
            .await
            .unwrap();

        assert_eq!(optimized.optimized_route.len(), 3);
        assert!(optimized.route_distance_km.unwrap() > 0.0);
        assert!(optimized.route_duration_min.unwrap() > 0.0);
        assert!(optimized.route_geometry.is_some());
        assert_eq!(optimized.route_instructions.len(), 2);
        assert_eq!(optimized.route_segment_geometries.len(), 2);

        // Same identities as the destination list.
        for d in &day.destinations {
            assert!(optimized.optimized_route.iter().any(|o| o.id == d.id));
        }
    }

    #[tokio::test]
    async fn anchor_is_excluded_from_stored_route() {
        let day = triangle_day();
        let anchor = GeoPoint::new(0.0, 0.5);
        let optimized = optimize_day(&day, Some(anchor), &MockRouteClient::new())
            .await
            .unwrap();

        assert_eq!(optimized.optimized_route.len(), 3);
        assert!(
            optimized
                .optimized_route
                .iter()
                .all(|d| d.name != CURRENT_LOCATION_NAME)
        );
        // Anchor leg trimmed: one instruction list per stored segment.
        assert_eq!(optimized.route_instructions.len(), 2);
        assert_eq!(optimized.route_segment_geometries.len(), 2);
    }

    #[tokio::test]
    async fn anchor_allows_single_destination() {
        let day = Day::new(1).add_destination(dest("A", 0.0, 0.0));
        let anchor = GeoPoint::new(0.1, 0.1);
        let optimized = optimize_day(&day, Some(anchor), &MockRouteClient::new())
            .await
            .unwrap();
        assert_eq!(optimized.optimized_route.len(), 1);
    }

    #[tokio::test]
    async fn insufficient_destinations_is_rejected() {
        let day = Day::new(1).add_destination(dest("A", 0.0, 0.0));
        let err = optimize_day(&day, None, &MockRouteClient::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::Validation(ValidationError::InsufficientDestinations)
        ));

        let empty = Day::new(1);
        let err = optimize_day(&empty, Some(GeoPoint::new(0.0, 0.0)), &MockRouteClient::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
    }

    /// Provider that answers with a fixed response regardless of input.
    struct CannedProvider(RouteResponse);

    impl RouteProvider for CannedProvider {
        fn optimal_route(
            &self,
            _waypoints: Vec<RouteWaypoint>,
        ) -> impl Future<Output = Result<RouteResponse, RouteError>> + Send {
            let response = self.0.clone();
            async move { Ok(response) }
        }
    }

    #[tokio::test]
    async fn short_response_is_malformed() {
        let day = triangle_day();
        let canned = CannedProvider(RouteResponse {
            optimized_route: vec![RoutedPlace {
                lat: 0.0,
                lon: 0.0,
                name: "A".into(),
            }],
            distance_km: 1.0,
            duration_min: 1.0,
            geometry: None,
            instructions: Vec::new(),
            segment_geometries: Vec::new(),
        });

        let err = optimize_day(&day, None, &canned).await.unwrap_err();
        assert!(matches!(err, RouteError::Malformed(_)));
    }

    #[tokio::test]
    async fn non_finite_metrics_are_malformed() {
        let day = triangle_day();
        let canned = CannedProvider(RouteResponse {
            optimized_route: vec![
                RoutedPlace { lat: 0.0, lon: 0.0, name: "A".into() },
                RoutedPlace { lat: 0.0, lon: 1.0, name: "B".into() },
                RoutedPlace { lat: 1.0, lon: 1.0, name: "C".into() },
            ],
            distance_km: f64::NAN,
            duration_min: 1.0,
            geometry: None,
            instructions: Vec::new(),
            segment_geometries: Vec::new(),
        });

        let err = optimize_day(&day, None, &canned).await.unwrap_err();
        assert!(matches!(err, RouteError::Malformed(_)));
    }

    #[tokio::test]
    async fn failure_leaves_prior_route_untouched() {
        // A day already optimized keeps its stored route when a later
        // optimization attempt fails; the optimizer never writes in place.
        let day = optimize_day_local(&triangle_day()).unwrap();
        let before = day.clone();

        let canned = CannedProvider(RouteResponse {
            optimized_route: vec![RoutedPlace {
                lat: 9.9,
                lon: 9.9,
                name: "Nowhere".into(),
            }],
            distance_km: 1.0,
            duration_min: 1.0,
            geometry: None,
            instructions: Vec::new(),
            segment_geometries: Vec::new(),
        });
        let result = optimize_day(&day, None, &canned).await;

        assert!(result.is_err());
        assert_eq!(day, before);
        assert!(day.has_route());
    }

    #[tokio::test]
    async fn duplicate_names_resolved_by_proximity() {
        // Two destinations share a name; matching must assign each routed
        // waypoint to the nearer one and still form a permutation.
        let day = Day::new(1)
            .add_destination(dest("Market", 0.0, 0.0))
            .add_destination(dest("Market", 0.0, 2.0))
            .add_destination(dest("Museum", 0.0, 1.0));

        let optimized = optimize_day(&day, None, &MockRouteClient::new())
            .await
            .unwrap();
        assert_eq!(optimized.optimized_route.len(), 3);
        let mut ids: Vec<&str> = optimized
            .optimized_route
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn route_state_derivation() {
        let day = Day::new(1);
        assert_eq!(RouteState::of(&day, false), RouteState::Unoptimized);
        assert_eq!(RouteState::of(&day, true), RouteState::Optimizing);

        let optimized = optimize_day_local(&triangle_day()).unwrap();
        assert_eq!(RouteState::of(&optimized, false), RouteState::Optimized);

        // A destination edit forces the day back to unoptimized.
        let edited = optimized.remove_destination(&optimized.destinations[0].id.clone());
        assert_eq!(RouteState::of(&edited, false), RouteState::Unoptimized);
    }
}
