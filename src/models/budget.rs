use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

text_enum! {
    pub enum BudgetCategory ("budget category") {
        Venue => "venue",
        Catering => "catering",
        Marketing => "marketing",
        Equipment => "equipment",
        Staff => "staff",
        Other => "other",
    }
}

text_enum! {
    pub enum BudgetItemStatus ("budget item status") {
        Planned => "planned",
        Approved => "approved",
        Spent => "spent",
        Cancelled => "cancelled",
    }
}

/// Event-scoped cost line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BudgetItem {
    pub id: Uuid,
    pub event_id: Uuid,
    pub item_name: String,
    #[sqlx(try_from = "String")]
    pub category: BudgetCategory,
    pub estimated_cost: Decimal,
    pub actual_cost: Option<Decimal>,
    #[sqlx(try_from = "String")]
    pub status: BudgetItemStatus,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated budget item form fields
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetItemInput {
    pub event_id: Uuid,
    pub item_name: String,
    pub category: BudgetCategory,
    pub estimated_cost: Decimal,
    #[serde(default)]
    pub actual_cost: Option<Decimal>,
    pub status: BudgetItemStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

pub type NewBudgetItem = BudgetItemInput;

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetItemChanges {
    pub item_name: Option<String>,
    pub category: Option<BudgetCategory>,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub status: Option<BudgetItemStatus>,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
}

impl BudgetItemChanges {
    /// Whether applying these changes moves `actual_cost` away from `current`
    pub fn changes_actual_cost(&self, current: Option<Decimal>) -> bool {
        matches!(self.actual_cost, Some(new) if current != Some(new))
    }
}

/// Estimated and actual spend for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub estimated: Decimal,
    pub actual: Decimal,
}

/// Aggregated budget for an event. Missing actual costs count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_estimated_cost: Decimal,
    pub total_actual_cost: Decimal,
    pub budget_by_category: BTreeMap<BudgetCategory, CategoryTotals>,
}

impl BudgetSummary {
    pub fn from_items(items: &[BudgetItem]) -> Self {
        items.iter().fold(Self::default(), |mut summary, item| {
            let actual = item.actual_cost.unwrap_or(Decimal::ZERO);
            summary.total_estimated_cost += item.estimated_cost;
            summary.total_actual_cost += actual;

            let totals = summary.budget_by_category.entry(item.category).or_default();
            totals.estimated += item.estimated_cost;
            totals.actual += actual;
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: BudgetCategory, estimated: i64, actual: Option<i64>) -> BudgetItem {
        BudgetItem {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            item_name: "Line".to_string(),
            category,
            estimated_cost: Decimal::from(estimated),
            actual_cost: actual.map(Decimal::from),
            status: BudgetItemStatus::Planned,
            notes: None,
            receipt_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_totals_and_categories() {
        let items = vec![
            item(BudgetCategory::Venue, 500, Some(450)),
            item(BudgetCategory::Catering, 200, None),
            item(BudgetCategory::Venue, 100, Some(120)),
        ];

        let summary = BudgetSummary::from_items(&items);

        assert_eq!(summary.total_estimated_cost, Decimal::from(800));
        assert_eq!(summary.total_actual_cost, Decimal::from(570));
        assert_eq!(
            summary.budget_by_category[&BudgetCategory::Venue],
            CategoryTotals {
                estimated: Decimal::from(600),
                actual: Decimal::from(570),
            }
        );
        assert_eq!(
            summary.budget_by_category[&BudgetCategory::Catering].actual,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = BudgetSummary::from_items(&[]);
        assert_eq!(summary.total_estimated_cost, Decimal::ZERO);
        assert!(summary.budget_by_category.is_empty());
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(BudgetSummary::from_items(&[item(
            BudgetCategory::Staff,
            10,
            None,
        )]))
        .unwrap();
        assert!(json.get("totalEstimatedCost").is_some());
        assert!(json["budgetByCategory"].get("staff").is_some());
    }

    #[test]
    fn test_changes_actual_cost() {
        let changes = BudgetItemChanges {
            actual_cost: Some(Decimal::from(75)),
            ..Default::default()
        };
        assert!(changes.changes_actual_cost(None));
        assert!(changes.changes_actual_cost(Some(Decimal::from(70))));
        assert!(!changes.changes_actual_cost(Some(Decimal::from(75))));
        assert!(!BudgetItemChanges::default().changes_actual_cost(None));
    }
}
