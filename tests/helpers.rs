#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use college_events::api::build_router;
use college_events::models::*;
use college_events::repositories::MemoryStore;
use college_events::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

/// A seeded user with a live bearer token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

/// Full router over an in-memory store, with one user per role
pub struct TestApp {
    pub store: MemoryStore,
    pub router: Router,
    pub admin: TestUser,
    pub organizer: TestUser,
    pub participant: TestUser,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let admin = seed_user(&store, "admin@college.edu", "Ada Admin", UserRole::Admin);
        let organizer = seed_user(&store, "organizer@college.edu", "Olu Organizer", UserRole::Organizer);
        let participant =
            seed_user(&store, "student@college.edu", "Pat Participant", UserRole::Participant);
        let router = build_router(AppState::in_memory(store.clone()), None);

        Self {
            store,
            router,
            admin,
            organizer,
            participant,
        }
    }

    /// Add another user to the running app
    pub fn add_user(&self, email: &str, role: UserRole) -> TestUser {
        seed_user(&self.store, email, "Extra User", role)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response was not JSON")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Create an event as `token`'s user and return its id
    pub async fn create_event(&self, token: &str, capacity: i32) -> String {
        let (status, body) = self
            .post("/api/events/create", Some(token), event_payload(capacity))
            .await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
        body["event"]["id"]
            .as_str()
            .expect("event id missing")
            .to_string()
    }

    pub async fn register(&self, token: &str, event_id: &str) -> (StatusCode, Value) {
        self.post(
            "/api/registrations/create",
            Some(token),
            json!({ "event_id": event_id, "ticket_type": "general" }),
        )
        .await
    }
}

pub fn seed_user(store: &MemoryStore, email: &str, name: &str, role: UserRole) -> TestUser {
    let user = store
        .insert_user(User::new(email, name, role))
        .expect("Failed to insert user");
    let token = store
        .issue_session(user.id, Duration::hours(1))
        .expect("Failed to issue session");
    TestUser { user, token }
}

/// A valid event payload a week from now
pub fn event_payload(capacity: i32) -> Value {
    let start = Utc::now() + Duration::days(7);
    let end = start + Duration::hours(3);
    json!({
        "title": "Spring Hackathon",
        "description": "Twenty-four hours of building things with friends",
        "location": "Engineering Hall",
        "start_date": start.to_rfc3339(),
        "end_date": end.to_rfc3339(),
        "capacity": capacity,
        "price": 0,
        "category": "technology",
    })
}

pub fn budget_payload(event_id: &str) -> Value {
    json!({
        "event_id": event_id,
        "item_name": "Pizza for volunteers",
        "category": "catering",
        "estimated_cost": "250.00",
        "status": "planned",
    })
}

pub fn schedule_payload(event_id: &str) -> Value {
    let start = Utc::now() + Duration::days(7);
    json!({
        "event_id": event_id,
        "title": "Opening keynote",
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::hours(1)).to_rfc3339(),
        "priority": 2,
        "status": "planned",
    })
}
