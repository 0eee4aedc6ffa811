//! Schedule endpoints

use super::extractors::{Identity, PathId, Payload};
use crate::error::AppResult;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// POST /api/schedule/create
pub async fn create_schedule_item(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let item = state.schedule.create_item(identity.caller(), &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Schedule item created successfully",
            "item": item,
        })),
    ))
}

/// GET /api/schedule/:event_id
pub async fn list_schedule(
    State(state): State<AppState>,
    identity: Identity,
    PathId(event_id): PathId,
) -> AppResult<Json<Value>> {
    let items = state
        .schedule
        .list_for_event(identity.caller(), event_id)
        .await?;
    Ok(Json(json!({ "items": items })))
}

/// PATCH /api/schedule/update/:id
pub async fn update_schedule_item(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
    Payload(payload): Payload,
) -> AppResult<Json<Value>> {
    let item = state
        .schedule
        .update_item(identity.caller(), id, &payload)
        .await?;

    Ok(Json(json!({
        "message": "Schedule item updated successfully",
        "item": item,
    })))
}

/// DELETE /api/schedule/delete/:id
pub async fn delete_schedule_item(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    state.schedule.delete_item(identity.caller(), id).await?;
    Ok(Json(json!({ "message": "Schedule item deleted successfully" })))
}
