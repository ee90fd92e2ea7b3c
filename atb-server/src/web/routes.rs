//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::domain::{BusStop, BusStops, Departures, NodeId};

use super::dto::{FormatQuery, JsonBody};
use super::error::AppError;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/busstops", get(list_bus_stops).fallback(not_found))
        .route("/api/v1/busstops/:node_id", get(get_bus_stop).fallback(not_found))
        .route(
            "/api/v1/departures/:node_id",
            get(get_departures).fallback(not_found),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// List every known bus stop.
async fn list_bus_stops(
    State(state): State<AppState>,
    format: FormatQuery,
) -> Result<JsonBody<Arc<BusStops>>, AppError> {
    let stops = fetch_bus_stops(&state).await?;
    Ok(JsonBody::new(stops, &format))
}

/// Look up a single bus stop.
async fn get_bus_stop(
    State(state): State<AppState>,
    node_id: Result<Path<String>, PathRejection>,
    format: FormatQuery,
) -> Result<JsonBody<BusStop>, AppError> {
    let node_id = parse_node_id(node_id)?;
    let stops = fetch_bus_stops(&state).await?;

    let stop = stops.get(node_id).cloned().ok_or_else(|| stop_not_found(node_id))?;
    Ok(JsonBody::new(stop, &format))
}

/// Upcoming departures from a bus stop.
async fn get_departures(
    State(state): State<AppState>,
    node_id: Result<Path<String>, PathRejection>,
    format: FormatQuery,
) -> Result<JsonBody<Arc<Departures>>, AppError> {
    let node_id = parse_node_id(node_id)?;

    // Unknown stops are rejected without asking AtB for a forecast.
    let stops = fetch_bus_stops(&state).await?;
    if !stops.contains(node_id) {
        return Err(stop_not_found(node_id));
    }

    let departures = state
        .atb
        .get_departures(node_id)
        .await
        .map_err(|e| AppError::internal("failed to get departures from atb", e))?;

    Ok(JsonBody::new(departures, &format))
}

async fn not_found() -> AppError {
    AppError::not_found("route not found")
}

/// Undecodable path segments are reported the same way as bad node IDs.
fn parse_node_id(path: Result<Path<String>, PathRejection>) -> Result<NodeId, AppError> {
    path.ok()
        .and_then(|Path(raw)| NodeId::parse(&raw).ok())
        .ok_or_else(|| AppError::bad_request("missing or invalid nodeID"))
}

async fn fetch_bus_stops(state: &AppState) -> Result<Arc<BusStops>, AppError> {
    state
        .atb
        .get_bus_stops()
        .await
        .map_err(|e| AppError::internal("failed to get bus stops from atb", e))
}

fn stop_not_found(node_id: NodeId) -> AppError {
    AppError::not_found(format!("bus stop with nodeID={node_id} not found"))
}
