//! Encoded polyline codec.
//!
//! Route geometries travel as polyline strings: each coordinate is a
//! signed, scaled delta from the previous one, at 1e-5 degree precision,
//! packed into printable ASCII 5 bits at a time. This is the format the
//! routing service emits for both the full route and per-segment
//! geometries.

use crate::domain::GeoPoint;

const PRECISION: f64 = 1e5;

/// Decode a polyline into coordinate pairs.
///
/// Decoding is lenient: truncated trailing data simply ends the list, and
/// any pair decoding to a non-finite coordinate is dropped rather than
/// failing the whole geometry.
pub fn decode(encoded: &str) -> Vec<GeoPoint> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        let Some((d_lat, next)) = decode_value(bytes, index) else {
            break;
        };
        let Some((d_lon, next)) = decode_value(bytes, next) else {
            break;
        };
        index = next;

        lat += d_lat;
        lon += d_lon;

        let point = GeoPoint::new(lat as f64 / PRECISION, lon as f64 / PRECISION);
        if point.is_finite() {
            points.push(point);
        }
    }

    points
}

/// Encode coordinate pairs into a polyline.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lon = (point.lon * PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

/// Decode one varint-packed signed value starting at `index`.
///
/// Returns the value and the index just past it, or `None` when the input
/// ends mid-value.
fn decode_value(bytes: &[u8], mut index: usize) -> Option<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(index)? as i64 - 63;
        if !(0..=63).contains(&byte) {
            return None;
        }
        index += 1;
        result |= (byte & 0x1f) << shift;
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }

    let value = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Some((value, index))
}

/// Encode one signed value as printable ASCII.
fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };

    while v >= 0x20 {
        out.push((((v & 0x1f) | 0x20) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Encode→decode recovers every point within the 1e-5 precision.
        #[test]
        fn roundtrip_within_precision(
            coords in proptest::collection::vec((-85.0f64..85.0, -180.0f64..180.0), 0..50)
        ) {
            let points: Vec<GeoPoint> =
                coords.iter().map(|(lat, lon)| GeoPoint::new(*lat, *lon)).collect();
            let decoded = decode(&encode(&points));
            prop_assert_eq!(decoded.len(), points.len());
            for (a, b) in points.iter().zip(&decoded) {
                prop_assert!((a.lat - b.lat).abs() < 1e-5 + 1e-9);
                prop_assert!((a.lon - b.lon).abs() < 1e-5 + 1e-9);
            }
        }

        /// The decoder never panics on arbitrary input.
        #[test]
        fn decode_never_panics(s in ".*") {
            let _ = decode(&s);
        }
    }
}
