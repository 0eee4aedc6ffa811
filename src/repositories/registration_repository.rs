use super::{found, RepoResult};
use crate::error::RepositoryError;
use crate::models::{NewRegistration, Registration, RegistrationStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Registration data access
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// The user's non-cancelled registration for the event, if any
    async fn find_active(&self, user_id: Uuid, event_id: Uuid)
        -> RepoResult<Option<Registration>>;

    /// Number of non-cancelled registrations for the event
    async fn count_active(&self, event_id: Uuid) -> RepoResult<i64>;

    /// Insert a confirmed registration only while the event has a free seat.
    ///
    /// The capacity check and the insert are atomic with respect to other
    /// calls for the same event.
    ///
    /// # Returns
    /// * `Ok(Some(registration))` - inserted
    /// * `Ok(None)` - the event was full
    /// * `Err(RepositoryError::NotFound)` - the event does not exist
    /// * `Err(RepositoryError::Duplicate)` - the user already holds an active registration
    async fn insert_within_capacity(
        &self,
        registration: NewRegistration,
    ) -> RepoResult<Option<Registration>>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Registration>>;

    /// Registrations for an event, oldest first
    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<Registration>>;

    /// A user's registrations, newest first
    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Registration>>;

    async fn update_status(&self, id: Uuid, status: RegistrationStatus)
        -> RepoResult<Registration>;

    /// Mark the attendee as checked in at `at`
    async fn check_in(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<Registration>;
}

/// PostgreSQL registration repository
pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    /// Create a new PgRegistrationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn find_active(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> RepoResult<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            SELECT * FROM registrations
            WHERE user_id = $1 AND event_id = $2 AND status <> 'cancelled'
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    async fn count_active(&self, event_id: Uuid) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status <> 'cancelled'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_within_capacity(
        &self,
        registration: NewRegistration,
    ) -> RepoResult<Option<Registration>> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the event serializes concurrent admissions for it
        let capacity: Option<(i32,)> =
            sqlx::query_as("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(registration.event_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((capacity,)) = capacity else {
            return Err(RepositoryError::NotFound("Event not found".to_string()));
        };

        // Duplicates are reported before capacity, even on a full event
        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM registrations
            WHERE user_id = $1 AND event_id = $2 AND status <> 'cancelled'
            "#,
        )
        .bind(registration.user_id)
        .bind(registration.event_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            tx.rollback().await?;
            return Err(RepositoryError::Duplicate(
                "active registration already exists".to_string(),
            ));
        }

        let (active,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status <> 'cancelled'",
        )
        .bind(registration.event_id)
        .fetch_one(&mut *tx)
        .await?;

        if active >= i64::from(capacity) {
            tx.rollback().await?;
            return Ok(None);
        }

        let inserted = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (
                user_id, event_id, status, payment_status, ticket_type,
                amount_paid, special_requirements
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(registration.user_id)
        .bind(registration.event_id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .bind(registration.payment_status.as_str())
        .bind(registration.ticket_type)
        .bind(registration.amount_paid)
        .bind(registration.special_requirements)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(inserted))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Registration>> {
        let registration =
            sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(registration)
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"
            SELECT * FROM registrations
            WHERE event_id = $1
            ORDER BY registration_date ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"
            SELECT * FROM registrations
            WHERE user_id = $1
            ORDER BY registration_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> RepoResult<Registration> {
        let updated = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        found(updated, "Registration")
    }

    async fn check_in(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<Registration> {
        let updated = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET check_in_status = TRUE, check_in_time = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        found(updated, "Registration")
    }
}
