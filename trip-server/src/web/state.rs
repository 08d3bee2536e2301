//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::CachedExchangeClient;
use crate::domain::Trip;
use crate::geocode::GeocodeClient;
use crate::plan::PlanStore;
use crate::routing::RouteClient;

use super::tokens::RequestTokens;

/// Shared application state.
///
/// The current trip is a persistent value behind a lock: every mutation
/// swaps in a newly built `Trip`, so readers always observe a consistent
/// tree and a failed operation leaves the previous value in place.
#[derive(Clone)]
pub struct AppState {
    /// The trip being edited
    pub trip: Arc<RwLock<Trip>>,

    /// Cached currency conversion client
    pub exchange: Arc<CachedExchangeClient>,

    /// Route optimization client
    pub routes: Arc<RouteClient>,

    /// Geocoding client
    pub geocoder: Arc<GeocodeClient>,

    /// Saved plan storage
    pub plans: Arc<PlanStore>,

    /// Supersession tokens for in-flight conversions and optimizations
    pub tokens: Arc<RequestTokens>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        trip: Trip,
        exchange: CachedExchangeClient,
        routes: RouteClient,
        geocoder: GeocodeClient,
        plans: PlanStore,
    ) -> Self {
        Self {
            trip: Arc::new(RwLock::new(trip)),
            exchange: Arc::new(exchange),
            routes: Arc::new(routes),
            geocoder: Arc::new(geocoder),
            plans: Arc::new(plans),
            tokens: Arc::new(RequestTokens::new()),
        }
    }
}
