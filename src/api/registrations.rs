//! Registration endpoints

use super::extractors::{Identity, PathId, Payload};
use crate::error::AppResult;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// POST /api/registrations/create
pub async fn create_registration(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let registration = state
        .registrations
        .register(identity.caller(), &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "registration": registration,
        })),
    ))
}

/// GET /api/registrations/mine
pub async fn my_registrations(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Value>> {
    let registrations = state
        .registrations
        .my_registrations(identity.caller())
        .await?;
    Ok(Json(json!({ "registrations": registrations })))
}

/// GET /api/registrations/event/:event_id
pub async fn event_roster(
    State(state): State<AppState>,
    identity: Identity,
    PathId(event_id): PathId,
) -> AppResult<Json<Value>> {
    let roster = state
        .registrations
        .roster(identity.caller(), event_id)
        .await?;
    Ok(Json(json!(roster)))
}

/// PATCH /api/registrations/cancel/:id
pub async fn cancel_registration(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let registration = state.registrations.cancel(identity.caller(), id).await?;

    Ok(Json(json!({
        "message": "Registration cancelled",
        "registration": registration,
    })))
}

/// PATCH /api/registrations/check-in/:id
pub async fn check_in(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let registration = state.registrations.check_in(identity.caller(), id).await?;

    Ok(Json(json!({
        "message": "Attendee checked in",
        "registration": registration,
    })))
}
