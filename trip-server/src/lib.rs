//! Trip itinerary planner server.
//!
//! Assembles multi-day itineraries: a trip of ordered days, each day an
//! ordered list of destinations, each destination carrying costs in
//! possibly foreign currencies. Computes optimized visiting orders per day
//! and resolves all costs into one display currency.

pub mod cache;
pub mod costs;
pub mod domain;
pub mod exchange;
pub mod geocode;
pub mod guidance;
pub mod plan;
pub mod routing;
pub mod web;
