use crate::auth::{self, Action, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{Event, ScheduleItem, ScheduleItemChanges, ScheduleItemInput};
use crate::repositories::{EventRepository, ScheduleRepository};
use crate::validation::{schemas, validate, IssueCode, ValidationFailure};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for event agendas
pub struct ScheduleService {
    events: Arc<dyn EventRepository>,
    schedule: Arc<dyn ScheduleRepository>,
}

impl ScheduleService {
    pub fn new(events: Arc<dyn EventRepository>, schedule: Arc<dyn ScheduleRepository>) -> Self {
        Self { events, schedule }
    }

    pub async fn create_item(
        &self,
        user: Option<&CurrentUser>,
        payload: &Value,
    ) -> AppResult<ScheduleItem> {
        auth::require_user(user)?;
        let input: ScheduleItemInput = validate(&schemas::schedule_item(), payload)?.parse()?;

        let event = self.event(input.event_id).await?;
        auth::authorize_event(user, Action::ManageSchedule, event.organizer_id)?;

        let item = self.schedule.create(input).await?;
        info!("Schedule item created: id={}, event={}", item.id, event.id);
        Ok(item)
    }

    /// Agenda for an event; readable by any signed-in user
    pub async fn list_for_event(
        &self,
        user: Option<&CurrentUser>,
        event_id: Uuid,
    ) -> AppResult<Vec<ScheduleItem>> {
        auth::require_user(user)?;
        self.event(event_id).await?;
        Ok(self.schedule.list_by_event(event_id).await?)
    }

    pub async fn update_item(
        &self,
        user: Option<&CurrentUser>,
        id: Uuid,
        payload: &Value,
    ) -> AppResult<ScheduleItem> {
        auth::require_user(user)?;
        let changes: ScheduleItemChanges =
            validate(&schemas::schedule_item_update(), payload)?.parse()?;

        let item = self.item(id).await?;
        let event = self.event(item.event_id).await?;
        auth::authorize_event(user, Action::ManageSchedule, event.organizer_id)?;

        let start = changes.start_time.unwrap_or(item.start_time);
        let end = changes.end_time.unwrap_or(item.end_time);
        if end <= start {
            return Err(ValidationFailure::single(
                if changes.end_time.is_some() { "end_time" } else { "start_time" },
                IssueCode::Custom,
                "End time must be after start time",
            )
            .into());
        }

        let updated = self.schedule.update(id, changes).await?;
        info!("Schedule item updated: id={}", id);
        Ok(updated)
    }

    pub async fn delete_item(&self, user: Option<&CurrentUser>, id: Uuid) -> AppResult<()> {
        auth::require_user(user)?;
        let item = self.item(id).await?;
        let event = self.event(item.event_id).await?;
        auth::authorize_event(user, Action::ManageSchedule, event.organizer_id)?;

        self.schedule.delete(id).await?;
        info!("Schedule item deleted: id={}", id);
        Ok(())
    }

    async fn event(&self, event_id: Uuid) -> AppResult<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn item(&self, id: Uuid) -> AppResult<ScheduleItem> {
        self.schedule
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule item not found".into()))
    }
}
