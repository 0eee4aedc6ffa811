//! Event endpoints

use super::extractors::{Identity, PathId, Payload};
use crate::error::{AppError, AppResult};
use crate::models::EventFilter;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// POST /api/events/create
pub async fn create_event(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let event = state.events.create_event(identity.caller(), &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully",
            "event": event,
        })),
    ))
}

/// GET /api/events?category=&status=&organizer_id=&limit=
pub async fn list_events(
    State(state): State<AppState>,
    filter: Result<Query<EventFilter>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(filter) = filter.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let events = state.events.list_events(&filter).await?;

    Ok(Json(json!({ "events": events })))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let event = state.events.get_event(id).await?;
    Ok(Json(json!({ "event": event })))
}

/// PATCH /api/events/update/:id
pub async fn update_event(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
    Payload(payload): Payload,
) -> AppResult<Json<Value>> {
    let event = state
        .events
        .update_event(identity.caller(), id, &payload)
        .await?;

    Ok(Json(json!({
        "message": "Event updated successfully",
        "event": event,
    })))
}

/// PATCH /api/events/status/:id
pub async fn update_event_status(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
    Payload(payload): Payload,
) -> AppResult<Json<Value>> {
    let event = state
        .events
        .update_status(identity.caller(), id, &payload)
        .await?;

    Ok(Json(json!({
        "message": "Event status updated successfully",
        "event": event,
    })))
}
