use super::extractors::Identity;
use crate::auth::Denied;
use crate::error::AppResult;
use axum::Json;
use serde_json::{json, Value};

/// GET /api/auth/session
///
/// The profile behind the bearer token, or 401.
pub async fn current_session(identity: Identity) -> AppResult<Json<Value>> {
    let user = identity.user.ok_or(Denied::Unauthenticated)?;
    Ok(Json(json!({ "user": user })))
}
