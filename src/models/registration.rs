use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    /// Registration status. Only `cancelled` frees a seat.
    pub enum RegistrationStatus ("registration status") {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    pub enum PaymentStatus ("payment status") {
        Pending => "pending",
        Completed => "completed",
        Refunded => "refunded",
    }
}

/// A user's seat at an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registration_date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: RegistrationStatus,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub ticket_type: String,
    pub amount_paid: Decimal,
    pub special_requirements: Option<String>,
    pub check_in_status: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Active registrations count against capacity
    pub fn is_active(&self) -> bool {
        self.status != RegistrationStatus::Cancelled
    }
}

/// Validated registration form fields
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationInput {
    pub event_id: Uuid,
    pub ticket_type: String,
    #[serde(default)]
    pub amount_paid: Decimal,
    #[serde(default = "default_payment_status")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub special_requirements: Option<String>,
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Completed
}

/// Insert payload for the registrations table
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_type: String,
    pub amount_paid: Decimal,
    pub payment_status: PaymentStatus,
    pub special_requirements: Option<String>,
}
