//! Domain types for the trip itinerary planner.
//!
//! This module contains the core entity tree (Trip → Day → Destination →
//! CostItem) plus the value types it is built from. The tree is persistent:
//! every operation returns a new value and re-establishes its invariants
//! (contiguous day numbering, minimum cardinalities), so code that receives
//! these types can trust their validity.

mod amount;
mod cost;
mod currency;
mod day;
mod destination;
mod error;
mod point;
mod trip;

pub use amount::{ParsedAmount, parse_amount};
pub use cost::CostItem;
pub use currency::{Currency, InvalidCurrency};
pub use day::Day;
pub use destination::Destination;
pub use error::ValidationError;
pub use point::GeoPoint;
pub use trip::Trip;
