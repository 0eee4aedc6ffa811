use super::{found, RepoResult};
use crate::error::RepositoryError;
use crate::models::{NewScheduleItem, ScheduleItem, ScheduleItemChanges};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Schedule item data access
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, item: NewScheduleItem) -> RepoResult<ScheduleItem>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ScheduleItem>>;

    /// Agenda for an event in running order
    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<ScheduleItem>>;

    async fn update(&self, id: Uuid, changes: ScheduleItemChanges) -> RepoResult<ScheduleItem>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

/// PostgreSQL schedule repository
pub struct PgScheduleRepository {
    pool: PgPool,
}

impl PgScheduleRepository {
    /// Create a new PgScheduleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn create(&self, item: NewScheduleItem) -> RepoResult<ScheduleItem> {
        let created = sqlx::query_as::<_, ScheduleItem>(
            r#"
            INSERT INTO schedule_items (
                event_id, title, description, start_time, end_time,
                location, speaker, category, priority, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(item.event_id)
        .bind(item.title)
        .bind(item.description)
        .bind(item.start_time)
        .bind(item.end_time)
        .bind(item.location)
        .bind(item.speaker)
        .bind(item.category)
        .bind(item.priority)
        .bind(item.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ScheduleItem>> {
        let item =
            sqlx::query_as::<_, ScheduleItem>("SELECT * FROM schedule_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(item)
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<ScheduleItem>> {
        let items = sqlx::query_as::<_, ScheduleItem>(
            r#"
            SELECT * FROM schedule_items
            WHERE event_id = $1
            ORDER BY start_time ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: ScheduleItemChanges) -> RepoResult<ScheduleItem> {
        let updated = sqlx::query_as::<_, ScheduleItem>(
            r#"
            UPDATE schedule_items SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                location = COALESCE($6, location),
                speaker = COALESCE($7, speaker),
                category = COALESCE($8, category),
                priority = COALESCE($9, priority),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.location)
        .bind(changes.speaker)
        .bind(changes.category)
        .bind(changes.priority)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        found(updated, "Schedule item")
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM schedule_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Schedule item not found".to_string()));
        }
        Ok(())
    }
}
