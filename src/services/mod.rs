pub mod admission;
pub mod budget_service;
pub mod event_service;
pub mod notification_service;
pub mod notifier;
pub mod registration_service;
pub mod schedule_service;

pub use admission::{AdmissionController, AdmissionError, EventLocks, Rejection};
pub use budget_service::BudgetService;
pub use event_service::EventService;
pub use notification_service::NotificationService;
pub use notifier::Notifier;
pub use registration_service::{RegistrationService, Roster};
pub use schedule_service::ScheduleService;
