use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use trip_server::cache::{CacheConfig, CachedExchangeClient};
use trip_server::domain::{Currency, Trip};
use trip_server::exchange::{ExchangeClient, ExchangeConfig};
use trip_server::geocode::{GeocodeClient, GeocodeConfig};
use trip_server::plan::PlanStore;
use trip_server::routing::{RouteClient, RouteConfig};
use trip_server::web::{AppState, create_router};

/// Directory of saved plans when PLAN_DIR is not set.
const DEFAULT_PLAN_DIR: &str = "data/plans";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Collaborator endpoints from the environment
    let mut exchange_config = ExchangeConfig::new();
    if let Ok(url) = std::env::var("EXCHANGE_API_URL") {
        exchange_config = exchange_config.with_base_url(url);
    }
    let mut route_config = RouteConfig::new();
    if let Ok(url) = std::env::var("ROUTE_API_URL") {
        route_config = route_config.with_base_url(url);
    }
    let mut geocode_config = GeocodeConfig::new();
    if let Ok(url) = std::env::var("GEOCODE_API_URL") {
        geocode_config = geocode_config.with_base_url(url);
    }

    let exchange_client =
        ExchangeClient::new(exchange_config).expect("Failed to create exchange client");
    let cached_exchange = CachedExchangeClient::new(exchange_client, &CacheConfig::default());

    let route_client = RouteClient::new(route_config).expect("Failed to create route client");
    let geocode_client =
        GeocodeClient::new(geocode_config).expect("Failed to create geocode client");

    let plan_dir = std::env::var("PLAN_DIR").unwrap_or_else(|_| DEFAULT_PLAN_DIR.to_string());
    let plans = PlanStore::new(plan_dir);

    // A fresh single-day trip until a plan is loaded
    let currency = std::env::var("TRIP_CURRENCY")
        .ok()
        .and_then(|c| Currency::parse_normalized(&c).ok())
        .unwrap_or_else(|| Currency::parse("USD").unwrap());
    let trip = Trip::new("New Trip", currency);

    let state = AppState::new(trip, cached_exchange, route_client, geocode_client, plans);

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let app = create_router(state, &static_dir);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    println!("Trip Planner listening on http://{addr}");
    println!();
    println!("Open http://{addr} in your browser for the API overview.");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health                        - Health check");
    println!("  GET  /api/trip                      - Current trip");
    println!("  POST /api/trip/days/{{id}}/optimize   - Optimize a day's route");
    println!("  POST /api/trip/currency             - Switch display currency");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
