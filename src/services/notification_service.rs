use crate::auth::{self, Action, CurrentUser, Resource};
use crate::error::{AppError, AppResult};
use crate::models::{AnnouncementInput, NewNotification, Notification, NotificationInput};
use crate::repositories::{EventRepository, NotificationRepository, UserRepository};
use crate::validation::{schemas, validate};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for user notifications and event announcements
pub struct NotificationService {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            users,
            events,
            notifications,
        }
    }

    /// The caller's inbox, newest first, with the unread count
    pub async fn inbox(&self, user: Option<&CurrentUser>) -> AppResult<(Vec<Notification>, usize)> {
        let user = auth::require_user(user)?;
        let notifications = self.notifications.list_for_user(user.id).await?;
        let unread = notifications.iter().filter(|n| !n.read).count();
        Ok((notifications, unread))
    }

    /// Send a direct notification (admins and organizers)
    pub async fn send(&self, user: Option<&CurrentUser>, payload: &Value) -> AppResult<Notification> {
        auth::authorize(user, Action::BroadcastNotification, Resource::None)?;
        let input: NotificationInput = validate(&schemas::notification(), payload)?.parse()?;

        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }
        if let Some(event_id) = input.event_id {
            if self.events.find_by_id(event_id).await?.is_none() {
                return Err(AppError::NotFound("Event not found".into()));
            }
        }

        let mut notification =
            NewNotification::to_user(input.user_id, input.title, input.message, input.kind);
        notification.event_id = input.event_id;

        let created = self.notifications.create(notification).await?;
        info!("Notification sent: id={}, recipient={}", created.id, input.user_id);
        Ok(created)
    }

    /// Recipient marks one notification read
    pub async fn mark_read(&self, user: Option<&CurrentUser>, id: Uuid) -> AppResult<Notification> {
        auth::require_user(user)?;
        let notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))?;
        auth::authorize(
            user,
            Action::ReadNotification,
            Resource::Notification {
                recipient_id: notification.user_id,
            },
        )?;

        Ok(self.notifications.mark_read(id).await?)
    }

    /// Mark the caller's whole inbox read; returns how many changed
    pub async fn mark_all_read(&self, user: Option<&CurrentUser>) -> AppResult<u64> {
        let user = auth::require_user(user)?;
        Ok(self.notifications.mark_all_read(user.id).await?)
    }

    /// Post an announcement on an event (its organizer or an admin)
    pub async fn announce(&self, user: Option<&CurrentUser>, payload: &Value) -> AppResult<Notification> {
        auth::authorize(user, Action::BroadcastNotification, Resource::None)?;
        let input: AnnouncementInput = validate(&schemas::announcement(), payload)?.parse()?;

        let event = self
            .events
            .find_by_id(input.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;
        auth::authorize_event(user, Action::BroadcastNotification, event.organizer_id)?;

        let created = self
            .notifications
            .create(NewNotification {
                user_id: None,
                title: input.title,
                message: input.message,
                kind: input.kind,
                event_id: Some(event.id),
                is_announcement: true,
                target_audience: input.target_audience,
                expiry_date: input.expiry_date,
            })
            .await?;
        info!("Announcement posted: id={}, event={}", created.id, event.id);
        Ok(created)
    }

    /// Unexpired announcements of an event
    pub async fn announcements(
        &self,
        user: Option<&CurrentUser>,
        event_id: Uuid,
    ) -> AppResult<Vec<Notification>> {
        auth::require_user(user)?;
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(self
            .notifications
            .list_announcements(event_id, Utc::now())
            .await?)
    }
}
