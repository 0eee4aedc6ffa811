use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    pub enum ScheduleStatus ("schedule status") {
        Planned => "planned",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// Agenda slot within an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScheduleItem {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub speaker: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i32>,
    #[sqlx(try_from = "String")]
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleItemInput {
    pub event_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    pub status: ScheduleStatus,
}

pub type NewScheduleItem = ScheduleItemInput;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleItemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub speaker: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i32>,
    pub status: Option<ScheduleStatus>,
}
