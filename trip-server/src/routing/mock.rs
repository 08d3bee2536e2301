//! Mock routing client for testing without a live routing engine.

use std::future::Future;

use crate::domain::GeoPoint;

use super::client::RouteProvider;
use super::error::RouteError;
use super::polyline;
use super::types::{RoutedPlace, RouteResponse, RouteWaypoint};

/// Road distances exceed great-circle distance; a flat factor stands in
/// for an actual road network.
const ROAD_FACTOR: f64 = 1.3;

/// Assumed driving speed for duration estimates, km/h.
const SPEED_KMH: f64 = 40.0;

/// Route provider that computes greedy orders locally.
///
/// Orders waypoints nearest-neighbour from the first entry, synthesizes
/// distance/duration from great-circle legs, and emits straight-line
/// geometries and placeholder instructions. Useful for tests and for
/// running the server without a routing engine.
#[derive(Debug, Clone, Default)]
pub struct MockRouteClient;

impl MockRouteClient {
    pub fn new() -> Self {
        Self
    }

    fn respond(&self, waypoints: Vec<RouteWaypoint>) -> Result<RouteResponse, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::NoRoute);
        }

        // Greedy nearest-neighbour from the first waypoint.
        let mut ordered: Vec<RouteWaypoint> = vec![waypoints[0].clone()];
        let mut remaining: Vec<RouteWaypoint> = waypoints[1..].to_vec();
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

        let points: Vec<GeoPoint> = ordered.iter().map(|w| w.point()).collect();

        let mut distance_km = 0.0;
        let mut instructions = Vec::new();
        let mut segment_geometries = Vec::new();
        for pair in points.windows(2) {
            distance_km += pair[0].haversine_km(&pair[1]) * ROAD_FACTOR;
            segment_geometries.push(polyline::encode(pair));
        }
        for pair in ordered.windows(2) {
            instructions.push(vec![
                format!("Head towards {}", pair[1].name),
                format!("Arrive at {}", pair[1].name),
            ]);
        }

        Ok(RouteResponse {
            optimized_route: ordered
                .into_iter()
                .map(|w| RoutedPlace {
                    lat: w.lat,
                    lon: w.lon,
                    name: w.name,
                })
                .collect(),
            distance_km,
            duration_min: distance_km / SPEED_KMH * 60.0,
            geometry: Some(polyline::encode(&points)),
            instructions,
            segment_geometries,
        })
    }
}

impl RouteProvider for MockRouteClient {
    fn optimal_route(
        &self,
        waypoints: Vec<RouteWaypoint>,
    ) -> impl Future<Output = Result<RouteResponse, RouteError>> + Send {
        let response = self.respond(waypoints);
        async move { response }
    }
}
