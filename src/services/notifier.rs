use crate::models::{BudgetItem, Event, NewNotification, NotificationKind};
use crate::repositories::NotificationRepository;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Best-effort notification side channel.
///
/// Inserts are awaited inline but never fail the caller; a failed insert is
/// logged and reported as `false`. No retries.
#[derive(Clone)]
pub struct Notifier {
    notifications: Arc<dyn NotificationRepository>,
}

impl Notifier {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Insert one notification, returning whether the row was written
    pub async fn emit(&self, notification: NewNotification) -> bool {
        let recipient = notification.user_id;
        let title = notification.title.clone();

        match self.notifications.create(notification).await {
            Ok(created) => {
                debug!(notification_id = %created.id, ?recipient, %title, "Notification emitted");
                true
            }
            Err(e) => {
                warn!(?recipient, %title, error = %e, "Failed to emit notification");
                false
            }
        }
    }

    /// Tell the organizer their event is live
    pub async fn event_created(&self, event: &Event) -> bool {
        self.emit(NewNotification::to_user(
            event.organizer_id,
            "Event Created",
            format!("Your event \"{}\" has been created successfully.", event.title),
            NotificationKind::Success,
        ))
        .await
    }

    /// Tell the acting user a budget line's actual cost moved
    pub async fn budget_updated(&self, acting_user: Uuid, item: &BudgetItem) -> bool {
        let actual = item.actual_cost.unwrap_or_default();
        let mut notification = NewNotification::to_user(
            acting_user,
            "Budget Updated",
            format!(
                "Actual cost for \"{}\" has been updated to ${}",
                item.item_name, actual
            ),
            NotificationKind::Info,
        );
        notification.event_id = Some(item.event_id);
        self.emit(notification).await
    }
}
