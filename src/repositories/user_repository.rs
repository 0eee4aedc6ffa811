use super::RepoResult;
use crate::models::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only access to users and their sessions. Both tables are written by
/// the auth subsystem.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by UUID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Resolve the user owning an unexpired session
    ///
    /// # Arguments
    /// * `token_hash` - hex SHA-256 of the bearer token
    /// * `now` - sessions expiring at or before this instant are ignored
    async fn find_by_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<User>>;
}

/// PostgreSQL user lookups
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, avatar_url, user_role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.full_name, u.avatar_url, u.user_role, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
