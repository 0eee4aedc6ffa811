//! Budget endpoints

use super::extractors::{Identity, PathId, Payload};
use crate::error::AppResult;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// POST /api/budgets/create
pub async fn create_budget_item(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let item = state.budgets.create_item(identity.caller(), &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Budget item created successfully",
            "item": item,
        })),
    ))
}

/// PATCH /api/budgets/update/:id
pub async fn update_budget_item(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
    Payload(payload): Payload,
) -> AppResult<Json<Value>> {
    let item = state
        .budgets
        .update_item(identity.caller(), id, &payload)
        .await?;

    Ok(Json(json!({
        "message": "Budget item updated successfully",
        "item": item,
    })))
}

/// GET /api/budgets/:event_id
pub async fn list_budget(
    State(state): State<AppState>,
    identity: Identity,
    PathId(event_id): PathId,
) -> AppResult<Json<Value>> {
    let (items, summary) = state
        .budgets
        .list_for_event(identity.caller(), event_id)
        .await?;

    Ok(Json(json!({
        "items": items,
        "summary": summary,
    })))
}

/// DELETE /api/budgets/delete/:id
pub async fn delete_budget_item(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    state.budgets.delete_item(identity.caller(), id).await?;
    Ok(Json(json!({ "message": "Budget item deleted successfully" })))
}
