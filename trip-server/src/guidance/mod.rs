//! Per-segment route guidance.
//!
//! A pure lookup over a day's optimized route: segment `i` runs from
//! route destination `i` to `i + 1`, carrying that leg's decoded geometry
//! and its turn-by-turn instructions for the navigation view.

use crate::domain::{Day, Destination, GeoPoint, ValidationError};
use crate::routing::polyline;

/// One leg of an optimized route, resolved for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentGuidance {
    pub from: Destination,
    pub to: Destination,
    /// Decoded leg geometry; empty when the route carries none.
    pub geometry: Vec<GeoPoint>,
    /// Turn-by-turn instructions; empty when the route carries none.
    pub instructions: Vec<String>,
}

/// Resolve one segment of a day's optimized route.
///
/// A route of length N has segments `0..=N-2`. An empty route or an
/// out-of-range index fails with `InvalidSegment`. Missing per-segment
/// geometry or instructions degrade to empty lists; only the segment
/// endpoints are mandatory.
pub fn segment_guidance(day: &Day, segment_index: usize) -> Result<SegmentGuidance, ValidationError> {
    let route = &day.optimized_route;
    if route.len() < 2 || segment_index + 1 >= route.len() {
        return Err(ValidationError::InvalidSegment);
    }

    let geometry = day
        .route_segment_geometries
        .get(segment_index)
        .map(|encoded| polyline::decode(encoded))
        .unwrap_or_default();

    let instructions = day
        .route_instructions
        .get(segment_index)
        .cloned()
        .unwrap_or_default();

    Ok(SegmentGuidance {
        from: route[segment_index].clone(),
        to: route[segment_index + 1].clone(),
        geometry,
        instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    fn usd() -> Currency {
        Currency::parse("USD").unwrap()
    }

    fn dest(name: &str, lat: f64, lon: f64) -> Destination {
        Destination::new(name, "", lat, lon, usd())
    }

    fn guided_day() -> Day {
        let a = dest("A", 10.0, 106.0);
        let b = dest("B", 10.1, 106.1);
        let c = dest("C", 10.2, 106.2);

        let seg0 = polyline::encode(&[a.point(), b.point()]);
        let seg1 = polyline::encode(&[b.point(), c.point()]);

        Day::new(1)
            .add_destination(a.clone())
            .add_destination(b.clone())
            .add_destination(c.clone())
            .with_route(
                vec![a, b, c],
                Some(30.0),
                Some(45.0),
                None,
                vec![
                    vec!["Head east".into(), "Arrive at B".into()],
                    vec!["Continue east".into(), "Arrive at C".into()],
                ],
                vec![seg0, seg1],
            )
    }

    #[test]
    fn resolves_segment_endpoints() {
        let day = guided_day();

        let seg = segment_guidance(&day, 0).unwrap();
        assert_eq!(seg.from.name, "A");
        assert_eq!(seg.to.name, "B");

        let seg = segment_guidance(&day, 1).unwrap();
        assert_eq!(seg.from.name, "B");
        assert_eq!(seg.to.name, "C");
    }

    #[test]
    fn decodes_segment_geometry() {
        let day = guided_day();
        let seg = segment_guidance(&day, 0).unwrap();

        assert_eq!(seg.geometry.len(), 2);
        assert!((seg.geometry[0].lat - 10.0).abs() < 1e-5);
        assert!((seg.geometry[1].lat - 10.1).abs() < 1e-5);
    }

    #[test]
    fn returns_segment_instructions() {
        let day = guided_day();
        let seg = segment_guidance(&day, 1).unwrap();
        assert_eq!(seg.instructions, vec!["Continue east", "Arrive at C"]);
    }

    #[test]
    fn one_past_last_segment_is_invalid() {
        let day = guided_day();
        // Route length 3 → segments 0 and 1; index 2 is one past the end.
        let err = segment_guidance(&day, day.optimized_route.len() - 1).unwrap_err();
        assert_eq!(err, ValidationError::InvalidSegment);
    }

    #[test]
    fn far_out_of_range_is_invalid() {
        let day = guided_day();
        assert_eq!(
            segment_guidance(&day, 99).unwrap_err(),
            ValidationError::InvalidSegment
        );
    }

    #[test]
    fn empty_route_is_invalid() {
        let day = Day::new(1);
        assert_eq!(
            segment_guidance(&day, 0).unwrap_err(),
            ValidationError::InvalidSegment
        );
    }

    #[test]
    fn missing_segment_data_degrades_to_empty() {
        let a = dest("A", 0.0, 0.0);
        let b = dest("B", 0.0, 1.0);
        let day = Day::new(1)
            .add_destination(a.clone())
            .add_destination(b.clone())
            .with_route(vec![a, b], None, None, None, Vec::new(), Vec::new());

        let seg = segment_guidance(&day, 0).unwrap();
        assert!(seg.geometry.is_empty());
        assert!(seg.instructions.is_empty());
    }
}
