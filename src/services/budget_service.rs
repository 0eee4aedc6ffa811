use crate::auth::{self, Action, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{BudgetItem, BudgetItemChanges, BudgetItemInput, BudgetSummary, Event};
use crate::repositories::{BudgetRepository, EventRepository};
use crate::services::Notifier;
use crate::validation::{schemas, validate};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for event budgets. Ownership resolves through the parent event.
pub struct BudgetService {
    events: Arc<dyn EventRepository>,
    budgets: Arc<dyn BudgetRepository>,
    notifier: Notifier,
}

impl BudgetService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        budgets: Arc<dyn BudgetRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            events,
            budgets,
            notifier,
        }
    }

    pub async fn create_item(
        &self,
        user: Option<&CurrentUser>,
        payload: &Value,
    ) -> AppResult<BudgetItem> {
        auth::require_user(user)?;
        let input: BudgetItemInput = validate(&schemas::budget_item(), payload)?.parse()?;

        let event = self.event(input.event_id).await?;
        auth::authorize_event(user, Action::ManageBudget, event.organizer_id)?;

        let item = self.budgets.create(input).await?;
        info!("Budget item created: id={}, event={}", item.id, event.id);
        Ok(item)
    }

    /// Partial edit. Moving `actual_cost` notifies the acting user.
    pub async fn update_item(
        &self,
        user: Option<&CurrentUser>,
        id: Uuid,
        payload: &Value,
    ) -> AppResult<BudgetItem> {
        let acting = auth::require_user(user)?;
        let changes: BudgetItemChanges =
            validate(&schemas::budget_item_update(), payload)?.parse()?;

        let item = self.item(id).await?;
        let event = self.event(item.event_id).await?;
        auth::authorize_event(user, Action::ManageBudget, event.organizer_id)?;

        let actual_cost_moved = changes.changes_actual_cost(item.actual_cost);
        let updated = self.budgets.update(id, changes).await?;

        if actual_cost_moved {
            self.notifier.budget_updated(acting.id, &updated).await;
        }

        info!("Budget item updated: id={}", id);
        Ok(updated)
    }

    /// Items of an event, newest first, with totals
    pub async fn list_for_event(
        &self,
        user: Option<&CurrentUser>,
        event_id: Uuid,
    ) -> AppResult<(Vec<BudgetItem>, BudgetSummary)> {
        auth::require_user(user)?;
        let event = self.event(event_id).await?;
        auth::authorize_event(user, Action::ViewBudget, event.organizer_id)?;

        let items = self.budgets.list_by_event(event_id).await?;
        let summary = BudgetSummary::from_items(&items);
        Ok((items, summary))
    }

    pub async fn delete_item(&self, user: Option<&CurrentUser>, id: Uuid) -> AppResult<()> {
        auth::require_user(user)?;
        let item = self.item(id).await?;
        let event = self.event(item.event_id).await?;
        auth::authorize_event(user, Action::ManageBudget, event.organizer_id)?;

        self.budgets.delete(id).await?;
        info!("Budget item deleted: id={}", id);
        Ok(())
    }

    async fn event(&self, event_id: Uuid) -> AppResult<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn item(&self, id: Uuid) -> AppResult<BudgetItem> {
        self.budgets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Budget item not found".into()))
    }
}
