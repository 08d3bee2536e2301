//! Route optimization for a day's destinations.
//!
//! The optimizer consumes a day's destination list (optionally anchored at
//! the traveller's position), asks the external routing service for an
//! optimal visiting order, and writes the result back onto a new day value.
//! A local nearest-neighbour heuristic over great-circle distance serves as
//! the fallback when no external optimization is wanted or reachable.

mod client;
mod error;
mod mock;
mod optimizer;
pub mod polyline;
mod types;

pub use client::{RouteClient, RouteConfig, RouteProvider};
pub use error::RouteError;
pub use mock::MockRouteClient;
pub use optimizer::{
    CURRENT_LOCATION_NAME, RouteState, nearest_neighbor_order, optimize_day, optimize_day_local,
};
pub use types::{RoutedPlace, RouteResponse, RouteWaypoint};
