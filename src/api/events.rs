//! Event endpoints (conferences and journals)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::event::{EventDetails, EventSummary},
    AppState,
};

/// List events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses(
        (status = 200, description = "Events with edition counts", body = Vec<EventSummary>)
    )
)]
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<EventSummary>>> {
    let events = state.services.events.list().await?;
    Ok(Json(events))
}

/// Get event by short name (case-insensitive)
#[utoipa::path(
    get,
    path = "/events/shortname/{short_name}",
    tag = "events",
    params(("short_name" = String, Path, description = "Event short name, e.g. neurips")),
    responses(
        (status = 200, description = "Event with editions, categories and counts", body = EventDetails),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_event_by_short_name(
    State(state): State<AppState>,
    Path(short_name): Path<String>,
) -> AppResult<Json<EventDetails>> {
    let event = state.services.events.get_by_short_name(&short_name).await?;
    Ok(Json(event))
}
