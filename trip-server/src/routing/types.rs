//! Routing service wire DTOs.
//!
//! The request is an ordered list of named coordinates; the response is the
//! optimized visiting order plus route metrics and geometry. Responses use
//! `Option` and defaults liberally because different routing backends name
//! and omit fields differently.

use serde::{Deserialize, Serialize};

use crate::domain::GeoPoint;

/// One input waypoint for an optimization request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteWaypoint {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl RouteWaypoint {
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: name.into(),
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Response from the optimization endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// Waypoints in optimized visiting order.
    pub optimized_route: Vec<RoutedPlace>,

    /// Total route distance in kilometres.
    pub distance_km: f64,

    /// Total route duration in minutes.
    pub duration_min: f64,

    /// Encoded polyline for the whole route.
    #[serde(default)]
    pub geometry: Option<String>,

    /// Turn-by-turn instructions, one list per segment.
    #[serde(default)]
    pub instructions: Vec<Vec<String>>,

    /// Encoded polyline per segment, parallel to `instructions`.
    #[serde(default)]
    pub segment_geometries: Vec<String>,
}

/// One waypoint in the optimized order.
///
/// Backends disagree on coordinate field names (`lat`/`latitude`,
/// `lon`/`lng`/`longitude`); aliases normalize them to one shape here so
/// nothing downstream has to care.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoutedPlace {
    #[serde(alias = "latitude")]
    pub lat: f64,

    #[serde(alias = "longitude", alias = "lng")]
    pub lon: f64,

    pub name: String,
}

impl RoutedPlace {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_response() {
        let json = r#"{
            "optimized_route": [
                {"lat": 10.77, "lon": 106.69, "name": "A"},
                {"lat": 10.78, "lon": 106.70, "name": "B"}
            ],
            "distance_km": 3.2,
            "duration_min": 11.5,
            "geometry": "abc",
            "instructions": [["Head north", "Arrive at B"]],
            "segment_geometries": ["abc"]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.optimized_route.len(), 2);
        assert_eq!(response.optimized_route[0].name, "A");
        assert_eq!(response.distance_km, 3.2);
        assert_eq!(response.duration_min, 11.5);
        assert_eq!(response.instructions[0].len(), 2);
        assert_eq!(response.segment_geometries.len(), 1);
    }

    #[test]
    fn deserialize_long_field_names() {
        let json = r#"{"latitude": 10.77, "longitude": 106.69, "name": "A"}"#;
        let place: RoutedPlace = serde_json::from_str(json).unwrap();
        assert_eq!(place.lat, 10.77);
        assert_eq!(place.lon, 106.69);
    }

    #[test]
    fn deserialize_lng_field_name() {
        let json = r#"{"lat": 10.77, "lng": 106.69, "name": "A"}"#;
        let place: RoutedPlace = serde_json::from_str(json).unwrap();
        assert_eq!(place.lon, 106.69);
    }

    #[test]
    fn geometry_fields_default_when_missing() {
        let json = r#"{
            "optimized_route": [{"lat": 1.0, "lon": 2.0, "name": "A"}],
            "distance_km": 0.0,
            "duration_min": 0.0
        }"#;

        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert!(response.geometry.is_none());
        assert!(response.instructions.is_empty());
        assert!(response.segment_geometries.is_empty());
    }

    #[test]
    fn serialize_waypoint() {
        let wp = RouteWaypoint::new(10.77, 106.69, "Current location");
        let json = serde_json::to_value(&wp).unwrap();
        assert_eq!(json["lat"], 10.77);
        assert_eq!(json["lon"], 106.69);
        assert_eq!(json["name"], "Current location");
    }
}
