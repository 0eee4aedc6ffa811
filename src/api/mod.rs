//! HTTP API.
//!
//! Handlers are thin: resolve identity, hand the raw payload to a service,
//! and wrap the result in `{ message, <record> }`. Failures render through
//! `AppError` as `{ error }`.

pub mod budgets;
pub mod events;
pub mod extractors;
pub mod health;
pub mod notifications;
pub mod registrations;
pub mod routes;
pub mod schedule;
pub mod session;

pub use extractors::{Identity, PathId, Payload};
pub use routes::build_router;
