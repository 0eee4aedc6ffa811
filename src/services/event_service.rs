use crate::auth::{self, Action, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{Event, EventChanges, EventFilter, EventInput, EventStatus, NewEvent};
use crate::repositories::EventRepository;
use crate::services::{EventLocks, Notifier};
use crate::validation::{schemas, validate, IssueCode, ValidationFailure};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
struct StatusChange {
    status: EventStatus,
}

/// Service for managing events
pub struct EventService {
    events: Arc<dyn EventRepository>,
    locks: Arc<EventLocks>,
    notifier: Notifier,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        locks: Arc<EventLocks>,
        notifier: Notifier,
    ) -> Self {
        Self {
            events,
            locks,
            notifier,
        }
    }

    /// Create a published event owned by the caller.
    ///
    /// Emits an "Event Created" notification to the organizer; a failure to
    /// emit does not fail the creation.
    pub async fn create_event(
        &self,
        user: Option<&CurrentUser>,
        payload: &Value,
    ) -> AppResult<Event> {
        auth::authorize(user, Action::CreateEvent, auth::Resource::None)?;
        let user = auth::require_user(user)?;

        let input: EventInput = validate(&schemas::event(), payload)?.parse()?;

        info!("Creating event: organizer={}, title={}", user.id, input.title);

        let event = self
            .events
            .create(NewEvent {
                organizer_id: user.id,
                status: EventStatus::Published,
                input,
            })
            .await?;

        self.notifier.event_created(&event).await;

        info!("Event created: id={}", event.id);
        Ok(event)
    }

    /// Get an event by ID
    pub async fn get_event(&self, id: Uuid) -> AppResult<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    /// Public event listing
    pub async fn list_events(&self, filter: &EventFilter) -> AppResult<Vec<Event>> {
        if matches!(filter.limit, Some(limit) if limit < 1) {
            return Err(AppError::BadRequest("limit must be at least 1".into()));
        }
        Ok(self.events.list(filter).await?)
    }

    /// Partial edit by the organizer or an admin.
    ///
    /// A capacity below the active registrations is rejected on `capacity`.
    pub async fn update_event(
        &self,
        user: Option<&CurrentUser>,
        id: Uuid,
        payload: &Value,
    ) -> AppResult<Event> {
        auth::require_user(user)?;
        let changes: EventChanges = validate(&schemas::event_update(), payload)?.parse()?;
        if changes.is_empty() {
            return Err(AppError::BadRequest("No fields to update".into()));
        }

        let event = self.get_event(id).await?;
        auth::authorize_event(user, Action::ManageEvent, event.organizer_id)?;

        let start = changes.start_date.unwrap_or(event.start_date);
        let end = changes.end_date.unwrap_or(event.end_date);
        if end <= start {
            return Err(ValidationFailure::single(
                if changes.end_date.is_some() { "end_date" } else { "start_date" },
                IssueCode::Custom,
                "End date must be after start date",
            )
            .into());
        }

        // Capacity edits queue behind in-flight admissions for this event
        let _guard = self.locks.acquire(id).await;
        let updated = self.events.update(id, changes).await?;
        info!("Event updated: id={}", updated.id);
        Ok(updated)
    }

    /// Soft status change (draft, published, cancelled, completed)
    pub async fn update_status(
        &self,
        user: Option<&CurrentUser>,
        id: Uuid,
        payload: &Value,
    ) -> AppResult<Event> {
        auth::require_user(user)?;
        let StatusChange { status } = validate(&schemas::event_status(), payload)?.parse()?;

        let event = self.get_event(id).await?;
        auth::authorize_event(user, Action::ManageEvent, event.organizer_id)?;

        let updated = self.events.update_status(id, status).await?;
        info!("Event status changed: id={}, status={}", id, status);
        Ok(updated)
    }
}
