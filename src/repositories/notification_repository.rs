use super::{found, RepoResult};
use crate::models::{NewNotification, Notification};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Notification data access
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> RepoResult<Notification>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Notification>>;

    /// Notifications addressed to the user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Notification>>;

    /// Flip the read flag on one notification
    async fn mark_read(&self, id: Uuid) -> RepoResult<Notification>;

    /// Flip every unread notification of the user; returns how many changed
    async fn mark_all_read(&self, user_id: Uuid) -> RepoResult<u64>;

    /// Unexpired announcements for an event, newest first
    async fn list_announcements(
        &self,
        event_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Notification>>;
}

/// PostgreSQL notification repository
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: NewNotification) -> RepoResult<Notification> {
        let created = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (
                user_id, title, message, kind, event_id,
                is_announcement, target_audience, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.title)
        .bind(notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.event_id)
        .bind(notification.is_announcement)
        .bind(notification.target_audience.map(|a| a.as_str()))
        .bind(notification.expiry_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid) -> RepoResult<Notification> {
        let updated = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET read = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        found(updated, "Notification")
    }

    async fn mark_all_read(&self, user_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET read = TRUE, updated_at = NOW()
            WHERE user_id = $1 AND read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_announcements(
        &self,
        event_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Notification>> {
        let announcements = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE event_id = $1
              AND is_announcement = TRUE
              AND (expiry_date IS NULL OR expiry_date > $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }
}
