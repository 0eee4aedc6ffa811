use super::{found, RepoResult};
use crate::error::RepositoryError;
use crate::models::{Event, EventChanges, EventFilter, EventStatus, NewEvent};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Event data access
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event
    async fn create(&self, event: NewEvent) -> RepoResult<Event>;

    /// Find an event by UUID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Event>>;

    /// List events matching `filter`, earliest start first
    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>>;

    /// Apply a partial update.
    ///
    /// A new capacity below the event's active registrations fails with
    /// `RepositoryError::CapacityBelowActive`; the check and the write are
    /// atomic against concurrent admissions.
    async fn update(&self, id: Uuid, changes: EventChanges) -> RepoResult<Event>;

    /// Soft status change (events are never hard-deleted)
    async fn update_status(&self, id: Uuid, status: EventStatus) -> RepoResult<Event>;
}

/// PostgreSQL event repository
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Create a new PgEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, event: NewEvent) -> RepoResult<Event> {
        let input = event.input;
        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                organizer_id, title, description, location, start_date, end_date,
                capacity, price, category, status, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(event.organizer_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.location)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.capacity)
        .bind(input.price)
        .bind(input.category)
        .bind(event.status.as_str())
        .bind(input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        // A NULL limit means no limit
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR organizer_id = $3)
            ORDER BY start_date ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.organizer_id)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> RepoResult<Event> {
        let mut tx = self.pool.begin().await?;

        // Same row lock admissions take, so no insert lands between the
        // recount and the write
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM events WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound("Event not found".to_string()));
        }

        if let Some(capacity) = changes.capacity {
            let (active,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status <> 'cancelled'",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if i64::from(capacity) < active {
                tx.rollback().await?;
                return Err(RepositoryError::CapacityBelowActive(active));
            }
        }

        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                capacity = COALESCE($7, capacity),
                price = COALESCE($8, price),
                category = COALESCE($9, category),
                image_url = COALESCE($10, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.capacity)
        .bind(changes.price)
        .bind(changes.category)
        .bind(changes.image_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> RepoResult<Event> {
        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        found(updated, "Event")
    }
}
