//! Data access layer.
//!
//! One trait per entity, implemented for PostgreSQL (`Pg*Repository`) and by
//! the in-memory [`MemoryStore`]. Every write stamps `updated_at` itself.
//! Expected outcomes (missing rows, constraint hits) come back as
//! [`RepositoryError`] values; transport faults come back as
//! `RepositoryError::Unavailable`.

pub mod budget_repository;
pub mod event_repository;
pub mod memory;
pub mod notification_repository;
pub mod registration_repository;
pub mod schedule_repository;
pub mod user_repository;

pub use budget_repository::{BudgetRepository, PgBudgetRepository};
pub use event_repository::{EventRepository, PgEventRepository};
pub use memory::MemoryStore;
pub use notification_repository::{NotificationRepository, PgNotificationRepository};
pub use registration_repository::{PgRegistrationRepository, RegistrationRepository};
pub use schedule_repository::{PgScheduleRepository, ScheduleRepository};
pub use user_repository::{PgUserRepository, UserRepository};

use crate::error::RepositoryError;

/// Result type for data access
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Turn an empty `UPDATE ... RETURNING` into a not-found error
pub(crate) fn found<T>(row: Option<T>, entity: &str) -> RepoResult<T> {
    row.ok_or_else(|| RepositoryError::NotFound(format!("{} not found", entity)))
}
