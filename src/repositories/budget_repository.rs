use super::{found, RepoResult};
use crate::error::RepositoryError;
use crate::models::{BudgetItem, BudgetItemChanges, NewBudgetItem};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Budget line item data access
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn create(&self, item: NewBudgetItem) -> RepoResult<BudgetItem>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<BudgetItem>>;

    /// Items for an event, newest first
    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<BudgetItem>>;

    async fn update(&self, id: Uuid, changes: BudgetItemChanges) -> RepoResult<BudgetItem>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

/// PostgreSQL budget repository
pub struct PgBudgetRepository {
    pool: PgPool,
}

impl PgBudgetRepository {
    /// Create a new PgBudgetRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetRepository for PgBudgetRepository {
    async fn create(&self, item: NewBudgetItem) -> RepoResult<BudgetItem> {
        let created = sqlx::query_as::<_, BudgetItem>(
            r#"
            INSERT INTO budget_items (
                event_id, item_name, category, estimated_cost, actual_cost,
                status, notes, receipt_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(item.event_id)
        .bind(item.item_name)
        .bind(item.category.as_str())
        .bind(item.estimated_cost)
        .bind(item.actual_cost)
        .bind(item.status.as_str())
        .bind(item.notes)
        .bind(item.receipt_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<BudgetItem>> {
        let item = sqlx::query_as::<_, BudgetItem>("SELECT * FROM budget_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<BudgetItem>> {
        let items = sqlx::query_as::<_, BudgetItem>(
            r#"
            SELECT * FROM budget_items
            WHERE event_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: BudgetItemChanges) -> RepoResult<BudgetItem> {
        let updated = sqlx::query_as::<_, BudgetItem>(
            r#"
            UPDATE budget_items SET
                item_name = COALESCE($2, item_name),
                category = COALESCE($3, category),
                estimated_cost = COALESCE($4, estimated_cost),
                actual_cost = COALESCE($5, actual_cost),
                status = COALESCE($6, status),
                notes = COALESCE($7, notes),
                receipt_url = COALESCE($8, receipt_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.item_name)
        .bind(changes.category.map(|c| c.as_str()))
        .bind(changes.estimated_cost)
        .bind(changes.actual_cost)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.notes)
        .bind(changes.receipt_url)
        .fetch_optional(&self.pool)
        .await?;

        found(updated, "Budget item")
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM budget_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Budget item not found".to_string()));
        }
        Ok(())
    }
}
