//! College Events Backend Library
//!
//! Event management for college organizers: events, capacity-bounded
//! registrations, budgets, schedules and notifications over an axum HTTP API.
//! Exposed as a library for the binary and the integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use repositories::*;
use services::*;
use std::sync::Arc;

/// Application state containing all repositories and services
#[derive(Clone)]
pub struct AppState {
    /// Present when backed by PostgreSQL; used by the health check
    pub database: Option<Database>,
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<EventService>,
    pub registrations: Arc<RegistrationService>,
    pub budgets: Arc<BudgetService>,
    pub schedule: Arc<ScheduleService>,
    pub notifications: Arc<NotificationService>,
}

impl AppState {
    /// Create a new AppState over PostgreSQL repositories
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self::build(
            Some(Database::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgEventRepository::new(pool.clone())),
            Arc::new(PgRegistrationRepository::new(pool.clone())),
            Arc::new(PgBudgetRepository::new(pool.clone())),
            Arc::new(PgScheduleRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool)),
        )
    }

    /// Create a new AppState over a shared in-memory store
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::build(
            None,
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }

    fn build(
        database: Option<Database>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        budgets: Arc<dyn BudgetRepository>,
        schedule: Arc<dyn ScheduleRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        let notifier = Notifier::new(notifications.clone());
        let locks = Arc::new(EventLocks::new());

        Self {
            database,
            users: users.clone(),
            events: Arc::new(EventService::new(events.clone(), locks.clone(), notifier.clone())),
            registrations: Arc::new(RegistrationService::new(
                events.clone(),
                registrations,
                locks,
            )),
            budgets: Arc::new(BudgetService::new(events.clone(), budgets, notifier)),
            schedule: Arc::new(ScheduleService::new(events.clone(), schedule)),
            notifications: Arc::new(NotificationService::new(users, events, notifications)),
        }
    }
}
