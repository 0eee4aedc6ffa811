use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    /// Event lifecycle status
    pub enum EventStatus ("event status") {
        Draft => "draft",
        Published => "published",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

/// Organizer-owned event. `capacity` bounds the number of active registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub category: String,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated event form fields
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Insert payload for the events table
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organizer_id: Uuid,
    pub status: EventStatus,
    pub input: EventInput,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.capacity.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
    }
}

/// List filters. Results are ordered by start date ascending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub category: Option<String>,
    pub status: Option<EventStatus>,
    pub organizer_id: Option<Uuid>,
    pub limit: Option<i64>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.category.as_ref().map_or(true, |c| &event.category == c)
            && self.status.map_or(true, |s| event.status == s)
            && self.organizer_id.map_or(true, |o| event.organizer_id == o)
    }
}
