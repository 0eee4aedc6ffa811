//! Payload schemas for every mutating route

use super::{Field, Schema};
use crate::models::{
    BudgetCategory, BudgetItemStatus, EventStatus, NotificationKind, PaymentStatus,
    ScheduleStatus, TargetAudience,
};

/// Largest value a `NUMERIC(12, 2)` money column holds
const MAX_MONEY: f64 = 9_999_999_999.99;

/// Largest value an `INTEGER` column holds
const MAX_INTEGER: f64 = i32::MAX as f64;

fn event_fields(schema: Schema) -> Schema {
    schema
        .field(
            Field::text("title")
                .min_len(3, "Title must be at least 3 characters")
                .max_len(100, "Title must be at most 100 characters"),
        )
        .field(
            Field::text("description")
                .min_len(10, "Description must be at least 10 characters"),
        )
        .field(Field::text("location").min_len(3, "Location is required"))
        .field(
            Field::timestamp("start_date")
                .invalid("Invalid start date")
                .future("Start date must be in the future"),
        )
        .field(
            Field::timestamp("end_date")
                .invalid("Invalid end date")
                .future("End date must be in the future"),
        )
        .field(
            Field::integer("capacity")
                .positive("Capacity must be a positive number")
                .max(MAX_INTEGER, "Capacity is too large"),
        )
        .field(
            Field::number("price")
                .non_negative("Price cannot be negative")
                .max(MAX_MONEY, "Price is too large"),
        )
        .field(Field::text("category").min_len(1, "Category is required"))
        .field(Field::url("image_url", "Invalid image URL").optional())
        .after("end_date", "start_date", "End date must be after start date")
}

/// New event
pub fn event() -> Schema {
    event_fields(Schema::new())
}

/// Partial event edit
pub fn event_update() -> Schema {
    event_fields(Schema::new()).partial()
}

pub fn event_status() -> Schema {
    Schema::new().field(Field::one_of("status", EventStatus::names()))
}

pub fn registration() -> Schema {
    Schema::new()
        .field(Field::uuid("event_id", "Invalid event ID"))
        .field(Field::text("ticket_type").min_len(1, "Ticket type is required"))
        .field(
            Field::number("amount_paid")
                .optional()
                .non_negative("Amount paid cannot be negative")
                .max(MAX_MONEY, "Amount paid is too large"),
        )
        .field(Field::one_of("payment_status", PaymentStatus::names()).optional())
        .field(Field::text("special_requirements").optional())
}

fn budget_item_fields(schema: Schema) -> Schema {
    schema
        .field(
            Field::text("item_name").min_len(3, "Item name must be at least 3 characters"),
        )
        .field(Field::one_of("category", BudgetCategory::names()))
        .field(
            Field::number("estimated_cost")
                .non_negative("Estimated cost cannot be negative")
                .max(MAX_MONEY, "Estimated cost is too large"),
        )
        .field(
            Field::number("actual_cost")
                .optional()
                .non_negative("Actual cost cannot be negative")
                .max(MAX_MONEY, "Actual cost is too large"),
        )
        .field(Field::one_of("status", BudgetItemStatus::names()))
        .field(Field::text("notes").optional())
        .field(Field::url("receipt_url", "Invalid receipt URL").optional())
}

pub fn budget_item() -> Schema {
    budget_item_fields(
        Schema::new().field(Field::uuid("event_id", "Invalid event ID format")),
    )
}

/// Partial budget item edit; the owning event cannot change
pub fn budget_item_update() -> Schema {
    budget_item_fields(Schema::new()).partial()
}

fn schedule_item_fields(schema: Schema) -> Schema {
    schema
        .field(Field::text("title").min_len(3, "Title must be at least 3 characters"))
        .field(Field::text("description").optional())
        .field(Field::timestamp("start_time").invalid("Invalid start time"))
        .field(Field::timestamp("end_time").invalid("Invalid end time"))
        .field(Field::text("location").optional())
        .field(Field::text("speaker").optional())
        .field(Field::text("category").optional())
        .field(
            Field::integer("priority")
                .optional()
                .min(1.0, "Priority must be between 1 and 5")
                .max(5.0, "Priority must be between 1 and 5"),
        )
        .field(Field::one_of("status", ScheduleStatus::names()))
        .after("end_time", "start_time", "End time must be after start time")
}

pub fn schedule_item() -> Schema {
    schedule_item_fields(
        Schema::new().field(Field::uuid("event_id", "Invalid event ID")),
    )
}

pub fn schedule_item_update() -> Schema {
    schedule_item_fields(Schema::new()).partial()
}

fn message_fields(schema: Schema) -> Schema {
    schema
        .field(Field::text("title").min_len(2, "Title must be at least 2 characters"))
        .field(Field::text("message").min_len(5, "Message is required"))
        .field(Field::one_of("type", NotificationKind::names()))
}

/// Direct notification to one user
pub fn notification() -> Schema {
    message_fields(
        Schema::new().field(Field::uuid("user_id", "Invalid user ID")),
    )
    .field(Field::uuid("event_id", "Invalid event ID").optional())
}

/// Event-wide announcement
pub fn announcement() -> Schema {
    message_fields(
        Schema::new().field(Field::uuid("event_id", "Invalid event ID")),
    )
    .field(Field::one_of("target_audience", TargetAudience::names()).optional())
    .field(
        Field::timestamp("expiry_date")
            .optional()
            .invalid("Invalid expiry date"),
    )
}
