//! Router configuration.

use super::{budgets, events, health, notifications, registrations, schedule, session};
use crate::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build the complete Axum router.
///
/// # Arguments
/// * `state` - Application state shared with handlers
/// * `cors_origin` - Single allowed browser origin; any origin when `None`
pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let api_routes = Router::new()
        // Identity
        .route("/auth/session", get(session::current_session))
        // Events
        .route("/events", get(events::list_events))
        .route("/events/create", post(events::create_event))
        .route("/events/:id", get(events::get_event))
        .route("/events/update/:id", patch(events::update_event))
        .route("/events/status/:id", patch(events::update_event_status))
        // Registrations
        .route(
            "/registrations/create",
            post(registrations::create_registration),
        )
        .route("/registrations/mine", get(registrations::my_registrations))
        .route(
            "/registrations/event/:event_id",
            get(registrations::event_roster),
        )
        .route(
            "/registrations/cancel/:id",
            patch(registrations::cancel_registration),
        )
        .route("/registrations/check-in/:id", patch(registrations::check_in))
        // Budgets
        .route("/budgets/create", post(budgets::create_budget_item))
        .route("/budgets/update/:id", patch(budgets::update_budget_item))
        .route("/budgets/delete/:id", delete(budgets::delete_budget_item))
        .route("/budgets/:event_id", get(budgets::list_budget))
        // Schedule
        .route("/schedule/create", post(schedule::create_schedule_item))
        .route("/schedule/update/:id", patch(schedule::update_schedule_item))
        .route("/schedule/delete/:id", delete(schedule::delete_schedule_item))
        .route("/schedule/:event_id", get(schedule::list_schedule))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/create",
            post(notifications::create_notification),
        )
        .route("/notifications/read/:id", patch(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/announce", post(notifications::announce))
        .route(
            "/notifications/announcements/:event_id",
            get(notifications::list_announcements),
        );

    Router::new()
        // Health check (no authentication)
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS origin: {}", e);
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
