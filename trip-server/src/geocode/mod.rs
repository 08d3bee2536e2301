//! Geocoding service client (forward and reverse).
//!
//! Used when creating a destination from free text or a map coordinate;
//! the route optimizer itself never geocodes.

mod client;
mod error;

pub use client::{GeocodeClient, GeocodeConfig, GeocodedPlace, ReversedPlace};
pub use error::GeocodeError;
