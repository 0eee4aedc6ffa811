//! Request extractors.
//!
//! - `Identity`: the caller resolved from `Authorization: Bearer <token>`
//! - `Payload`: a JSON body of any shape, left for schema validation
//! - `PathId`: a UUID path segment
//!
//! All rejections are `AppError`s so clients always get a JSON error body.

use crate::auth::{bearer_token, hash_token, CurrentUser};
use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Resolved caller. Missing, malformed, unknown or expired tokens all
/// resolve to no user; handlers never reject here for lack of identity.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub user: Option<User>,
    current: Option<CurrentUser>,
}

impl Identity {
    pub fn new(user: Option<User>) -> Self {
        let current = user.as_ref().map(CurrentUser::from);
        Self { user, current }
    }

    /// The caller as seen by the authorization gate
    pub fn caller(&self) -> Option<&CurrentUser> {
        self.current.as_ref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        let Some(token) = token else {
            return Ok(Self::default());
        };

        let user = state
            .users
            .find_by_session(&hash_token(token), Utc::now())
            .await?;

        Ok(Self::new(user))
    }
}

/// Raw JSON body
#[derive(Debug, Clone)]
pub struct Payload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// UUID taken from the single path parameter
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Uuid::parse_str(&raw)
            .map(Self)
            .map_err(|_| AppError::BadRequest("Invalid ID format".into()))
    }
}
