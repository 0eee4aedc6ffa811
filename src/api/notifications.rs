//! Notification endpoints

use super::extractors::{Identity, PathId, Payload};
use crate::error::AppResult;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Value>> {
    let (notifications, unread) = state.notifications.inbox(identity.caller()).await?;

    Ok(Json(json!({
        "notifications": notifications,
        "unreadCount": unread,
    })))
}

/// POST /api/notifications/create
pub async fn create_notification(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let notification = state.notifications.send(identity.caller(), &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Notification sent successfully",
            "notification": notification,
        })),
    ))
}

/// PATCH /api/notifications/read/:id
pub async fn mark_read(
    State(state): State<AppState>,
    identity: Identity,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let notification = state.notifications.mark_read(identity.caller(), id).await?;

    Ok(Json(json!({
        "message": "Notification marked as read",
        "notification": notification,
    })))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Value>> {
    let count = state.notifications.mark_all_read(identity.caller()).await?;

    Ok(Json(json!({
        "message": "All notifications marked as read",
        "count": count,
    })))
}

/// POST /api/notifications/announce
pub async fn announce(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<Value>)> {
    let announcement = state
        .notifications
        .announce(identity.caller(), &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Announcement posted successfully",
            "announcement": announcement,
        })),
    ))
}

/// GET /api/notifications/announcements/:event_id
pub async fn list_announcements(
    State(state): State<AppState>,
    identity: Identity,
    PathId(event_id): PathId,
) -> AppResult<Json<Value>> {
    let announcements = state
        .notifications
        .announcements(identity.caller(), event_id)
        .await?;
    Ok(Json(json!({ "announcements": announcements })))
}
