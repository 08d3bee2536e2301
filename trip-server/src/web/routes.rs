//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tracing::warn;

use crate::costs;
use crate::domain::{Currency, Day, Destination, GeoPoint, Trip, ValidationError};
use crate::exchange::ExchangeError;
use crate::geocode::GeocodeError;
use crate::guidance::segment_guidance;
use crate::plan::{PlanStoreError, TripPlan};
use crate::routing::{self, RouteError, RouteState};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/about", get(about_page))
        .route("/api/trip", get(get_trip).post(replace_trip))
        .route("/api/trip/total", get(trip_total))
        .route("/api/trip/currency", post(set_currency))
        .route("/api/trip/days", post(add_day))
        .route("/api/trip/days/swap", post(swap_days))
        .route("/api/trip/days/:day_id", axum::routing::delete(remove_day))
        .route("/api/trip/days/:day_id/insert-after", post(insert_day_after))
        .route("/api/trip/days/:day_id/total", get(day_total))
        .route("/api/trip/days/:day_id/optimize", post(optimize_day))
        .route(
            "/api/trip/days/:day_id/guidance/:segment",
            get(segment_guidance_lookup),
        )
        .route("/api/trip/days/:day_id/destinations", post(add_destination))
        .route(
            "/api/trip/days/:day_id/destinations/:dest_id",
            axum::routing::put(rename_destination).delete(remove_destination),
        )
        .route(
            "/api/trip/days/:day_id/destinations/:dest_id/costs",
            post(add_cost),
        )
        .route(
            "/api/trip/days/:day_id/destinations/:dest_id/costs/:cost_id",
            axum::routing::put(update_cost).delete(remove_cost),
        )
        .route("/api/geocode", get(geocode))
        .route("/api/plans", get(list_plans))
        .route("/api/plans/save", post(save_plan))
        .route("/api/plans/load", post(load_plan))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// About page.
async fn about_page() -> impl IntoResponse {
    Html(
        AboutTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Token key for a day's optimization requests.
fn optimize_key(day_id: &str) -> String {
    format!("optimize:{day_id}")
}

/// Render the current trip, deriving each day's route state from the
/// in-flight request markers.
async fn render_trip(state: &AppState, trip: &Trip) -> TripView {
    let mut states = Vec::with_capacity(trip.days.len());
    for day in &trip.days {
        let in_flight = state.tokens.in_flight(&optimize_key(&day.id)).await;
        states.push(RouteState::of(day, in_flight));
    }
    TripView::from_trip(trip, &states)
}

/// Current trip.
async fn get_trip(State(state): State<AppState>) -> Json<TripView> {
    let trip = state.trip.read().await.clone();
    Json(render_trip(&state, &trip).await)
}

/// Replace the current trip from a plan payload.
async fn replace_trip(
    State(state): State<AppState>,
    Json(plan): Json<TripPlan>,
) -> Result<Json<TripView>, AppError> {
    let trip = plan.to_trip().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    state.tokens.supersede_all().await;
    let mut current = state.trip.write().await;
    *current = trip.clone();
    drop(current);

    Ok(Json(render_trip(&state, &trip).await))
}

/// Append a day.
async fn add_day(State(state): State<AppState>) -> Json<TripView> {
    let trip = {
        let mut current = state.trip.write().await;
        let next = current.add_day();
        *current = next.clone();
        next
    };
    // Day ids are positional; outstanding requests may now point at the
    // wrong day, so drop them all.
    state.tokens.supersede_all().await;
    Json(render_trip(&state, &trip).await)
}

/// Remove a day.
async fn remove_day(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
) -> Result<Json<TripView>, AppError> {
    let trip = {
        let mut current = state.trip.write().await;
        let next = current.remove_day(&day_id)?;
        *current = next.clone();
        next
    };
    state.tokens.supersede_all().await;
    Ok(Json(render_trip(&state, &trip).await))
}

/// Insert an empty day after the named one.
async fn insert_day_after(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
) -> Json<TripView> {
    let trip = {
        let mut current = state.trip.write().await;
        let next = current.insert_day_after(&day_id);
        *current = next.clone();
        next
    };
    state.tokens.supersede_all().await;
    Json(render_trip(&state, &trip).await)
}

/// Swap two days.
async fn swap_days(
    State(state): State<AppState>,
    Json(req): Json<SwapDaysRequest>,
) -> Json<TripView> {
    let trip = {
        let mut current = state.trip.write().await;
        let next = current.swap_days(&req.a, &req.b);
        *current = next.clone();
        next
    };
    state.tokens.supersede_all().await;
    Json(render_trip(&state, &trip).await)
}

/// Create a destination from free text or a map coordinate.
async fn add_destination(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
    Json(req): Json<AddDestinationRequest>,
) -> Result<Json<DayView>, AppError> {
    let currency = state.trip.read().await.currency;

    let destination = build_destination(&state, &req, currency).await?;

    let day = {
        let mut current = state.trip.write().await;
        let day = current.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
        let next_day = day.add_destination(destination);
        let next = current.with_day_replaced(next_day.clone());
        *current = next;
        next_day
    };

    // The destination set changed: an in-flight optimization of this day
    // and an in-flight bulk conversion are both meaningless now.
    state.tokens.supersede(&optimize_key(&day_id)).await;
    state.tokens.supersede("currency").await;

    Ok(Json(DayView::from_day(&day, RouteState::Unoptimized)))
}

/// Geocode the request into a destination.
async fn build_destination(
    state: &AppState,
    req: &AddDestinationRequest,
    currency: Currency,
) -> Result<Destination, AppError> {
    if let (Some(lat), Some(lon)) = (req.lat, req.lon) {
        let point = GeoPoint::new(lat, lon);
        if !point.is_finite() {
            return Err(AppError::BadRequest {
                message: "coordinates must be finite numbers".to_string(),
            });
        }

        // Reverse geocoding failure only costs us the nicer name.
        let reversed = match state.geocoder.reverse(lat, lon).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed");
                None
            }
        };

        let fallback = req
            .name
            .clone()
            .unwrap_or_else(|| format!("{:.4}, {:.4}", lat, lon));
        let mut destination = Destination::from_geocoded(
            point,
            reversed.as_ref().map(|r| r.name.clone()),
            &fallback,
            currency,
        );
        if let Some(reversed) = reversed {
            destination.address = reversed.address;
        }
        if let Some(name) = &req.name {
            destination.name = name.clone();
        }
        return Ok(destination);
    }

    let query = req
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "either query or lat/lon is required".to_string(),
        })?;

    let place = state
        .geocoder
        .search(query)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("no match for {query:?}"),
        })?;

    let mut destination = Destination::from_geocoded(
        place.point,
        Some(place.display_name.clone()),
        query,
        currency,
    );
    destination.address = place.display_name;
    if let Some(name) = &req.name {
        destination.name = name.clone();
    }
    Ok(destination)
}

/// Rename a destination.
async fn rename_destination(
    State(state): State<AppState>,
    Path((day_id, dest_id)): Path<(String, String)>,
    Json(req): Json<RenameDestinationRequest>,
) -> Result<Json<DayView>, AppError> {
    let day = {
        let mut current = state.trip.write().await;
        let day = current.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
        if day.destination(&dest_id).is_none() {
            return Err(destination_not_found(&dest_id));
        }
        let next_day = day.rename_destination(&dest_id, req.name);
        let next = current.with_day_replaced(next_day.clone());
        *current = next;
        next_day
    };

    state.tokens.supersede(&optimize_key(&day_id)).await;

    Ok(Json(DayView::from_day(&day, RouteState::Unoptimized)))
}

/// Remove a destination.
async fn remove_destination(
    State(state): State<AppState>,
    Path((day_id, dest_id)): Path<(String, String)>,
) -> Result<Json<DayView>, AppError> {
    let day = {
        let mut current = state.trip.write().await;
        let day = current.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
        if day.destination(&dest_id).is_none() {
            return Err(destination_not_found(&dest_id));
        }
        let next_day = day.remove_destination(&dest_id);
        let next = current.with_day_replaced(next_day.clone());
        *current = next;
        next_day
    };

    state.tokens.supersede(&optimize_key(&day_id)).await;
    state.tokens.supersede("currency").await;

    Ok(Json(DayView::from_day(&day, RouteState::Unoptimized)))
}

/// Append a fresh cost entry to a destination.
async fn add_cost(
    State(state): State<AppState>,
    Path((day_id, dest_id)): Path<(String, String)>,
) -> Result<Json<DestinationView>, AppError> {
    let destination = {
        let mut current = state.trip.write().await;
        let currency = current.currency;
        let day = current.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
        let destination = day
            .destination(&dest_id)
            .ok_or_else(|| destination_not_found(&dest_id))?;

        let next_dest = destination.add_cost_item(currency);
        let next_day = day.with_destination_replaced(next_dest.clone());
        let next = current.with_day_replaced(next_day);
        *current = next;
        next_dest
    };

    Ok(Json(DestinationView::from_destination(&destination)))
}

/// Edit a cost entry.
async fn update_cost(
    State(state): State<AppState>,
    Path((day_id, dest_id, cost_id)): Path<(String, String, String)>,
    Json(req): Json<CostRequest>,
) -> Result<Json<DestinationView>, AppError> {
    let entered = match &req.currency {
        Some(code) => Currency::parse_normalized(code).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => state.trip.read().await.currency,
    };

    let destination = {
        let mut current = state.trip.write().await;
        let day = current.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
        let destination = day
            .destination(&dest_id)
            .ok_or_else(|| destination_not_found(&dest_id))?;
        if destination.cost_item(&cost_id).is_none() {
            return Err(AppError::NotFound {
                message: format!("no cost item {cost_id}"),
            });
        }

        let next_dest = destination.update_cost_item(&cost_id, req.detail, req.amount, entered);
        let next_day = day.with_destination_replaced(next_dest.clone());
        let next = current.with_day_replaced(next_day);
        *current = next;
        next_dest
    };

    Ok(Json(DestinationView::from_destination(&destination)))
}

/// Remove a cost entry.
async fn remove_cost(
    State(state): State<AppState>,
    Path((day_id, dest_id, cost_id)): Path<(String, String, String)>,
) -> Result<Json<DestinationView>, AppError> {
    let destination = {
        let mut current = state.trip.write().await;
        let day = current.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
        let destination = day
            .destination(&dest_id)
            .ok_or_else(|| destination_not_found(&dest_id))?;

        let next_dest = destination.remove_cost_item(&cost_id)?;
        let next_day = day.with_destination_replaced(next_dest.clone());
        let next = current.with_day_replaced(next_day);
        *current = next;
        next_dest
    };

    Ok(Json(DestinationView::from_destination(&destination)))
}

/// Total for one day.
async fn day_total(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
) -> Result<Json<TotalView>, AppError> {
    let trip = state.trip.read().await;
    let day = trip.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
    Ok(Json(TotalView::from_summary(costs::day_total(day))))
}

/// Total for the whole trip.
async fn trip_total(State(state): State<AppState>) -> Json<TotalView> {
    let trip = state.trip.read().await;
    Json(TotalView::from_summary(costs::trip_total(&trip)))
}

/// Optimize a day's visiting order.
///
/// The day is snapshotted, optimized outside the lock, and written back
/// only if no newer request or conflicting edit superseded this one in the
/// meantime.
async fn optimize_day(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<DayView>, AppError> {
    let snapshot: Day = {
        let trip = state.trip.read().await;
        trip.day(&day_id)
            .ok_or_else(|| day_not_found(&day_id))?
            .clone()
    };

    let key = optimize_key(&day_id);
    let token = state.tokens.issue(&key).await;

    let result = if req.local {
        routing::optimize_day_local(&snapshot)
    } else {
        let anchor = req.current_location.map(|l| l.point());
        routing::optimize_day(&snapshot, anchor, state.routes.as_ref()).await
    };

    let optimized = match result {
        Ok(day) => day,
        Err(e) => {
            // The day's previous route is untouched; just clear the marker.
            state.tokens.finish(&key, token).await;
            return Err(e.into());
        }
    };

    let mut current = state.trip.write().await;
    if !state.tokens.is_current(&key, token).await {
        return Err(AppError::Superseded);
    }
    let next = current.with_day_replaced(optimized.clone());
    *current = next;
    drop(current);
    state.tokens.finish(&key, token).await;

    Ok(Json(DayView::from_day(&optimized, RouteState::Optimized)))
}

/// Look up one guidance segment of a day's optimized route.
async fn segment_guidance_lookup(
    State(state): State<AppState>,
    Path((day_id, segment)): Path<(String, usize)>,
) -> Result<Json<GuidanceView>, AppError> {
    let trip = state.trip.read().await;
    let day = trip.day(&day_id).ok_or_else(|| day_not_found(&day_id))?;
    let guidance = segment_guidance(day, segment)?;
    Ok(Json(GuidanceView::from_segment(&guidance)))
}

/// Switch the display currency, re-deriving every cost from its original.
///
/// The conversion is all-or-nothing: a failure leaves the previously
/// resolved amounts showing, and a superseded response is discarded.
async fn set_currency(
    State(state): State<AppState>,
    Json(req): Json<CurrencyRequest>,
) -> Result<Json<TripView>, AppError> {
    let currency = Currency::parse_normalized(&req.currency).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let snapshot = state.trip.read().await.clone();

    let token = state.tokens.issue("currency").await;

    let resolved = match costs::resolve_trip(&snapshot, currency, state.exchange.as_ref()).await {
        Ok(trip) => trip,
        Err(e) => {
            state.tokens.finish("currency", token).await;
            return Err(e.into());
        }
    };

    let mut current = state.trip.write().await;
    if !state.tokens.is_current("currency", token).await {
        return Err(AppError::Superseded);
    }
    *current = resolved.clone();
    drop(current);
    state.tokens.finish("currency", token).await;

    Ok(Json(render_trip(&state, &resolved).await))
}

/// Forward geocode passthrough.
#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    q: String,
}

async fn geocode(
    State(state): State<AppState>,
    Query(req): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let place = state
        .geocoder
        .search(&req.q)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("no match for {:?}", req.q),
        })?;

    Ok(Json(GeocodeResponse {
        lat: place.point.lat,
        lon: place.point.lon,
        display_name: place.display_name,
    }))
}

/// List saved plans.
async fn list_plans(State(state): State<AppState>) -> Result<Json<PlanListResponse>, AppError> {
    let plans = state.plans.list()?;
    Ok(Json(PlanListResponse { plans }))
}

/// Save the current trip as a plan.
async fn save_plan(State(state): State<AppState>) -> Result<Json<SavePlanResponse>, AppError> {
    let trip = state.trip.read().await.clone();
    let plan = TripPlan::from_trip(&trip);
    let path = state.plans.save(&plan)?;
    Ok(Json(SavePlanResponse {
        path: path.display().to_string(),
    }))
}

/// Load a saved plan, replacing the current trip.
async fn load_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanNameRequest>,
) -> Result<Json<TripView>, AppError> {
    let plan = state.plans.load(&req.name)?;
    let trip = plan.to_trip().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    state.tokens.supersede_all().await;
    let mut current = state.trip.write().await;
    *current = trip.clone();
    drop(current);

    Ok(Json(render_trip(&state, &trip).await))
}

fn day_not_found(day_id: &str) -> AppError {
    AppError::NotFound {
        message: format!("no day {day_id}"),
    }
}

fn destination_not_found(dest_id: &str) -> AppError {
    AppError::NotFound {
        message: format!("no destination {dest_id}"),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Validation(ValidationError),
    /// A newer request took over before this one could apply.
    Superseded,
    /// An upstream collaborator failed; last-known-good state still shows.
    Upstream { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<ExchangeError> for AppError {
    fn from(e: ExchangeError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::Validation(v) => AppError::Validation(v),
            other => AppError::Upstream {
                message: other.to_string(),
            },
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<PlanStoreError> for AppError {
    fn from(e: PlanStoreError) -> Self {
        match e {
            PlanStoreError::NotFound(name) => AppError::NotFound {
                message: format!("no saved plan named {name:?}"),
            },
            other => AppError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, code) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone(), None),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone(), None),
            AppError::Validation(e) => {
                (StatusCode::BAD_REQUEST, e.to_string(), Some(e.code()))
            }
            AppError::Superseded => (
                StatusCode::CONFLICT,
                "superseded by a newer request".to_string(),
                Some("superseded"),
            ),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message.clone(), None),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone(), None)
            }
        };

        warn!(%status, error = %message, "request failed");

        let body = Json(ErrorResponse {
            error: message,
            code,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request_with_code() {
        let response = AppError::from(ValidationError::MinimumOneDay).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn route_validation_errors_stay_validation() {
        let err = AppError::from(RouteError::Validation(
            ValidationError::InsufficientDestinations,
        ));
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InsufficientDestinations)
        ));
    }

    #[test]
    fn route_service_errors_are_upstream() {
        let err = AppError::from(RouteError::NoRoute);
        assert!(matches!(err, AppError::Upstream { .. }));
    }

    #[test]
    fn superseded_maps_to_conflict() {
        let response = AppError::Superseded.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_plan_maps_to_not_found() {
        let err = AppError::from(PlanStoreError::NotFound("x".into()));
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
