use chrono::{DateTime, Utc};
use super::decode_text;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

text_enum! {
    pub enum NotificationKind ("notification type") {
        Info => "info",
        Warning => "warning",
        Success => "success",
        Error => "error",
    }
}

text_enum! {
    pub enum TargetAudience ("target audience") {
        All => "all",
        Participants => "participants",
        Organizers => "organizers",
        Sponsors => "sponsors",
        Staff => "staff",
    }
}

/// User-addressed message, or an event announcement when `is_announcement`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub event_id: Option<Uuid>,
    pub is_announcement: bool,
    pub target_audience: Option<TargetAudience>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Written by hand: the derive cannot map a nullable TEXT column onto
// `Option<TargetAudience>`.
impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let target_audience: Option<String> = row.try_get("target_audience")?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            kind: decode_text("kind", row.try_get("kind")?)?,
            read: row.try_get("read")?,
            event_id: row.try_get("event_id")?,
            is_announcement: row.try_get("is_announcement")?,
            target_audience: target_audience
                .map(|value| decode_text("target_audience", value))
                .transpose()?,
            expiry_date: row.try_get("expiry_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Insert payload for the notifications table
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub event_id: Option<Uuid>,
    pub is_announcement: bool,
    pub target_audience: Option<TargetAudience>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl NewNotification {
    /// A direct message to one user
    pub fn to_user(
        user_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            title: title.into(),
            message: message.into(),
            kind,
            event_id: None,
            is_announcement: false,
            target_audience: None,
            expiry_date: None,
        }
    }
}

/// Validated direct notification form fields
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationInput {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

/// Validated announcement form fields
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementInput {
    pub event_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub target_audience: Option<TargetAudience>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
}
