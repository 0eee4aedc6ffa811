//! In-memory store implementing every repository trait.
//!
//! Backs the `memory` storage backend and the test suite. All tables sit
//! behind one mutex, so each trait call is atomic, including the
//! capacity-checked registration insert.

use super::{
    BudgetRepository, EventRepository, NotificationRepository, RegistrationRepository,
    RepoResult, ScheduleRepository, UserRepository,
};
use crate::auth::hash_token;
use crate::error::RepositoryError;
use crate::models::{
    BudgetItem, BudgetItemChanges, Event, EventChanges, EventFilter, EventStatus, NewBudgetItem,
    NewEvent, NewNotification, NewRegistration, NewScheduleItem, Notification, Registration,
    RegistrationStatus, ScheduleItem, ScheduleItemChanges, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

struct Session {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Rows kept in insertion order
#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    events: Vec<Event>,
    registrations: Vec<Registration>,
    budget_items: Vec<BudgetItem>,
    schedule_items: Vec<ScheduleItem>,
    notifications: Vec<Notification>,
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_notification_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> RepoResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Add a user, as the auth subsystem would at signup
    pub fn insert_user(&self, user: User) -> RepoResult<User> {
        let mut tables = self.tables()?;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate(format!(
                "email {} already registered",
                user.email
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Open a session for the user and return its bearer token.
    ///
    /// Sessions that have already expired are dropped on the way.
    pub fn issue_session(&self, user_id: Uuid, ttl: Duration) -> RepoResult<String> {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let now = Utc::now();
        let mut tables = self.tables()?;
        tables.sessions.retain(|_, session| session.expires_at > now);
        tables.sessions.insert(
            hash_token(&token),
            Session {
                user_id,
                expires_at: now + ttl,
            },
        );
        Ok(token)
    }

    /// Make notification inserts fail, to exercise best-effort emission
    pub fn fail_notification_writes(&self, fail: bool) {
        self.fail_notification_writes.store(fail, Ordering::SeqCst);
    }

    /// Every stored notification, in insertion order
    pub fn notifications(&self) -> RepoResult<Vec<Notification>> {
        Ok(self.tables()?.notifications.clone())
    }

    /// Every stored registration, in insertion order
    pub fn registrations(&self) -> RepoResult<Vec<Registration>> {
        Ok(self.tables()?.registrations.clone())
    }
}

fn not_found(entity: &str) -> RepositoryError {
    RepositoryError::NotFound(format!("{} not found", entity))
}

fn active_count(tables: &Tables, event_id: Uuid) -> i64 {
    tables
        .registrations
        .iter()
        .filter(|r| r.event_id == event_id && r.is_active())
        .count() as i64
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn find_by_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<User>> {
        let tables = self.tables()?;
        let user = tables
            .sessions
            .get(token_hash)
            .filter(|session| session.expires_at > now)
            .and_then(|session| tables.users.get(&session.user_id))
            .cloned();
        Ok(user)
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, event: NewEvent) -> RepoResult<Event> {
        let now = Utc::now();
        let input = event.input;
        let created = Event {
            id: Uuid::new_v4(),
            organizer_id: event.organizer_id,
            title: input.title,
            description: input.description,
            location: input.location,
            start_date: input.start_date,
            end_date: input.end_date,
            capacity: input.capacity,
            price: input.price,
            category: input.category,
            status: event.status,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        };
        if created.capacity <= 0 {
            return Err(RepositoryError::ConstraintViolation(
                "capacity must be positive".to_string(),
            ));
        }
        self.tables()?.events.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Event>> {
        Ok(self.tables()?.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        let tables = self.tables()?;
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        if let Some(limit) = filter.limit {
            events.truncate(limit.max(0) as usize);
        }
        Ok(events)
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> RepoResult<Event> {
        let mut tables = self.tables()?;
        if let Some(capacity) = changes.capacity {
            let active = active_count(&tables, id);
            if i64::from(capacity) < active {
                return Err(RepositoryError::CapacityBelowActive(active));
            }
        }
        let event = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("Event"))?;

        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(description) = changes.description {
            event.description = description;
        }
        if let Some(location) = changes.location {
            event.location = location;
        }
        if let Some(start_date) = changes.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            event.end_date = end_date;
        }
        if let Some(capacity) = changes.capacity {
            event.capacity = capacity;
        }
        if let Some(price) = changes.price {
            event.price = price;
        }
        if let Some(category) = changes.category {
            event.category = category;
        }
        if let Some(image_url) = changes.image_url {
            event.image_url = Some(image_url);
        }
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> RepoResult<Event> {
        let mut tables = self.tables()?;
        let event = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("Event"))?;
        event.status = status;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }
}

#[async_trait]
impl RegistrationRepository for MemoryStore {
    async fn find_active(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> RepoResult<Option<Registration>> {
        Ok(self
            .tables()?
            .registrations
            .iter()
            .find(|r| r.user_id == user_id && r.event_id == event_id && r.is_active())
            .cloned())
    }

    async fn count_active(&self, event_id: Uuid) -> RepoResult<i64> {
        let tables = self.tables()?;
        Ok(active_count(&tables, event_id))
    }

    async fn insert_within_capacity(
        &self,
        registration: NewRegistration,
    ) -> RepoResult<Option<Registration>> {
        let mut tables = self.tables()?;

        let capacity = tables
            .events
            .iter()
            .find(|e| e.id == registration.event_id)
            .map(|e| e.capacity)
            .ok_or_else(|| not_found("Event"))?;

        let duplicate = tables.registrations.iter().any(|r| {
            r.user_id == registration.user_id && r.event_id == registration.event_id && r.is_active()
        });
        if duplicate {
            return Err(RepositoryError::Duplicate(
                "active registration already exists".to_string(),
            ));
        }

        if active_count(&tables, registration.event_id) >= i64::from(capacity) {
            return Ok(None);
        }

        let now = Utc::now();
        let inserted = Registration {
            id: Uuid::new_v4(),
            user_id: registration.user_id,
            event_id: registration.event_id,
            registration_date: now,
            status: RegistrationStatus::Confirmed,
            payment_status: registration.payment_status,
            ticket_type: registration.ticket_type,
            amount_paid: registration.amount_paid,
            special_requirements: registration.special_requirements,
            check_in_status: false,
            check_in_time: None,
            updated_at: now,
        };
        tables.registrations.push(inserted.clone());
        Ok(Some(inserted))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Registration>> {
        Ok(self
            .tables()?
            .registrations
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<Registration>> {
        Ok(self
            .tables()?
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Registration>> {
        Ok(self
            .tables()?
            .registrations
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> RepoResult<Registration> {
        let mut tables = self.tables()?;
        let registration = tables
            .registrations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Registration"))?;
        registration.status = status;
        registration.updated_at = Utc::now();
        Ok(registration.clone())
    }

    async fn check_in(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<Registration> {
        let mut tables = self.tables()?;
        let registration = tables
            .registrations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Registration"))?;
        registration.check_in_status = true;
        registration.check_in_time = Some(at);
        registration.updated_at = Utc::now();
        Ok(registration.clone())
    }
}

#[async_trait]
impl BudgetRepository for MemoryStore {
    async fn create(&self, item: NewBudgetItem) -> RepoResult<BudgetItem> {
        let mut tables = self.tables()?;
        if !tables.events.iter().any(|e| e.id == item.event_id) {
            return Err(RepositoryError::ConstraintViolation(
                "budget item references a missing event".to_string(),
            ));
        }
        let now = Utc::now();
        let created = BudgetItem {
            id: Uuid::new_v4(),
            event_id: item.event_id,
            item_name: item.item_name,
            category: item.category,
            estimated_cost: item.estimated_cost,
            actual_cost: item.actual_cost,
            status: item.status,
            notes: item.notes,
            receipt_url: item.receipt_url,
            created_at: now,
            updated_at: now,
        };
        tables.budget_items.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<BudgetItem>> {
        Ok(self
            .tables()?
            .budget_items
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<BudgetItem>> {
        Ok(self
            .tables()?
            .budget_items
            .iter()
            .rev()
            .filter(|i| i.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: BudgetItemChanges) -> RepoResult<BudgetItem> {
        let mut tables = self.tables()?;
        let item = tables
            .budget_items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("Budget item"))?;

        if let Some(item_name) = changes.item_name {
            item.item_name = item_name;
        }
        if let Some(category) = changes.category {
            item.category = category;
        }
        if let Some(estimated_cost) = changes.estimated_cost {
            item.estimated_cost = estimated_cost;
        }
        if let Some(actual_cost) = changes.actual_cost {
            item.actual_cost = Some(actual_cost);
        }
        if let Some(status) = changes.status {
            item.status = status;
        }
        if let Some(notes) = changes.notes {
            item.notes = Some(notes);
        }
        if let Some(receipt_url) = changes.receipt_url {
            item.receipt_url = Some(receipt_url);
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables()?;
        let before = tables.budget_items.len();
        tables.budget_items.retain(|i| i.id != id);
        if tables.budget_items.len() == before {
            return Err(not_found("Budget item"));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for MemoryStore {
    async fn create(&self, item: NewScheduleItem) -> RepoResult<ScheduleItem> {
        let mut tables = self.tables()?;
        if !tables.events.iter().any(|e| e.id == item.event_id) {
            return Err(RepositoryError::ConstraintViolation(
                "schedule item references a missing event".to_string(),
            ));
        }
        let now = Utc::now();
        let created = ScheduleItem {
            id: Uuid::new_v4(),
            event_id: item.event_id,
            title: item.title,
            description: item.description,
            start_time: item.start_time,
            end_time: item.end_time,
            location: item.location,
            speaker: item.speaker,
            category: item.category,
            priority: item.priority,
            status: item.status,
            created_at: now,
            updated_at: now,
        };
        tables.schedule_items.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ScheduleItem>> {
        Ok(self
            .tables()?
            .schedule_items
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepoResult<Vec<ScheduleItem>> {
        let mut items: Vec<ScheduleItem> = self
            .tables()?
            .schedule_items
            .iter()
            .filter(|i| i.event_id == event_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.start_time);
        Ok(items)
    }

    async fn update(&self, id: Uuid, changes: ScheduleItemChanges) -> RepoResult<ScheduleItem> {
        let mut tables = self.tables()?;
        let item = tables
            .schedule_items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("Schedule item"))?;

        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(description) = changes.description {
            item.description = Some(description);
        }
        if let Some(start_time) = changes.start_time {
            item.start_time = start_time;
        }
        if let Some(end_time) = changes.end_time {
            item.end_time = end_time;
        }
        if let Some(location) = changes.location {
            item.location = Some(location);
        }
        if let Some(speaker) = changes.speaker {
            item.speaker = Some(speaker);
        }
        if let Some(category) = changes.category {
            item.category = Some(category);
        }
        if let Some(priority) = changes.priority {
            item.priority = Some(priority);
        }
        if let Some(status) = changes.status {
            item.status = status;
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables()?;
        let before = tables.schedule_items.len();
        tables.schedule_items.retain(|i| i.id != id);
        if tables.schedule_items.len() == before {
            return Err(not_found("Schedule item"));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: NewNotification) -> RepoResult<Notification> {
        if self.fail_notification_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "notification writes disabled".to_string(),
            ));
        }
        let now = Utc::now();
        let created = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            read: false,
            event_id: notification.event_id,
            is_announcement: notification.is_announcement,
            target_audience: notification.target_audience,
            expiry_date: notification.expiry_date,
            created_at: now,
            updated_at: now,
        };
        self.tables()?.notifications.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        Ok(self
            .tables()?
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Notification>> {
        Ok(self
            .tables()?
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> RepoResult<Notification> {
        let mut tables = self.tables()?;
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found("Notification"))?;
        notification.read = true;
        notification.updated_at = Utc::now();
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> RepoResult<u64> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let mut changed = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == Some(user_id) && !n.read)
        {
            notification.read = true;
            notification.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn list_announcements(
        &self,
        event_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Notification>> {
        Ok(self
            .tables()?
            .notifications
            .iter()
            .rev()
            .filter(|n| n.is_announcement && n.event_id == Some(event_id))
            .filter(|n| n.expiry_date.map_or(true, |expiry| expiry > now))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventInput, PaymentStatus, UserRole};
    use rust_decimal::Decimal;

    fn new_event(organizer_id: Uuid, capacity: i32) -> NewEvent {
        NewEvent {
            organizer_id,
            status: EventStatus::Published,
            input: EventInput {
                title: "Robotics Expo".to_string(),
                description: "Student robotics showcase".to_string(),
                location: "Gym".to_string(),
                start_date: Utc::now() + Duration::days(10),
                end_date: Utc::now() + Duration::days(11),
                capacity,
                price: Decimal::ZERO,
                category: "expo".to_string(),
                image_url: None,
            },
        }
    }

    fn seat(user_id: Uuid, event_id: Uuid) -> NewRegistration {
        NewRegistration {
            user_id,
            event_id,
            ticket_type: "general".to_string(),
            amount_paid: Decimal::ZERO,
            payment_status: PaymentStatus::Completed,
            special_requirements: None,
        }
    }

    #[tokio::test]
    async fn test_session_lookup_honours_expiry() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(User::new("kim@college.edu", "Kim", UserRole::Participant))
            .unwrap();

        let live = store.issue_session(user.id, Duration::hours(1)).unwrap();
        let expired = store.issue_session(user.id, Duration::hours(-1)).unwrap();

        let found = store.find_by_session(&hash_token(&live), Utc::now()).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store
            .find_by_session(&hash_token(&expired), Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_session(&live, Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_expired_sessions_are_pruned_on_issue() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        store.issue_session(user_id, Duration::hours(-1)).unwrap();
        store.issue_session(user_id, Duration::hours(-2)).unwrap();
        assert_eq!(store.tables().unwrap().sessions.len(), 2);

        let live = store.issue_session(user_id, Duration::hours(1)).unwrap();
        let tables = store.tables().unwrap();
        assert_eq!(tables.sessions.len(), 1);
        assert!(tables.sessions.contains_key(&hash_token(&live)));
    }

    #[tokio::test]
    async fn test_capacity_edit_cannot_drop_below_active() {
        let store = MemoryStore::new();
        let event = EventRepository::create(&store, new_event(Uuid::new_v4(), 3))
            .await
            .unwrap();
        for _ in 0..2 {
            store
                .insert_within_capacity(seat(Uuid::new_v4(), event.id))
                .await
                .unwrap();
        }

        let shrink = |capacity| EventChanges {
            capacity: Some(capacity),
            ..Default::default()
        };
        let below = EventRepository::update(&store, event.id, shrink(1)).await;
        assert!(matches!(below, Err(RepositoryError::CapacityBelowActive(2))));

        let at_floor = EventRepository::update(&store, event.id, shrink(2))
            .await
            .unwrap();
        assert_eq!(at_floor.capacity, 2);
    }

    #[tokio::test]
    async fn test_insert_within_capacity_stops_at_capacity() {
        let store = MemoryStore::new();
        let event = EventRepository::create(&store, new_event(Uuid::new_v4(), 1))
            .await
            .unwrap();

        let first = store
            .insert_within_capacity(seat(Uuid::new_v4(), event.id))
            .await
            .unwrap();
        let second = store
            .insert_within_capacity(seat(Uuid::new_v4(), event.id))
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.count_active(event.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_registration_frees_seat_and_allows_rebooking() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let event = EventRepository::create(&store, new_event(Uuid::new_v4(), 1))
            .await
            .unwrap();

        let first = store
            .insert_within_capacity(seat(user_id, event.id))
            .await
            .unwrap()
            .unwrap();
        let duplicate = store.insert_within_capacity(seat(user_id, event.id)).await;
        assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));

        RegistrationRepository::update_status(&store, first.id, RegistrationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(store.count_active(event.id).await.unwrap(), 0);
        assert!(store
            .insert_within_capacity(seat(user_id, event.id))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_event_list_filters_and_orders() {
        let store = MemoryStore::new();
        let organizer = Uuid::new_v4();
        let mut later = new_event(organizer, 5);
        later.input.start_date = Utc::now() + Duration::days(40);
        let mut sooner = new_event(organizer, 5);
        sooner.input.category = "talk".to_string();
        EventRepository::create(&store, later).await.unwrap();
        EventRepository::create(&store, sooner).await.unwrap();
        EventRepository::create(&store, new_event(Uuid::new_v4(), 5))
            .await
            .unwrap();

        let mine = store
            .list(&EventFilter {
                organizer_id: Some(organizer),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].start_date < mine[1].start_date);

        let talks = store
            .list(&EventFilter {
                category: Some("talk".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(talks.len(), 1);

        let limited = store
            .list(&EventFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_stamp_updated_at() {
        let store = MemoryStore::new();
        let event = EventRepository::create(&store, new_event(Uuid::new_v4(), 5))
            .await
            .unwrap();
        let updated = EventRepository::update_status(&store, event.id, EventStatus::Cancelled)
            .await
            .unwrap();
        assert!(updated.updated_at >= event.updated_at);
        assert_eq!(updated.status, EventStatus::Cancelled);

        let missing =
            EventRepository::update_status(&store, Uuid::new_v4(), EventStatus::Draft).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_only_unread() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        for title in ["One", "Two", "Three"] {
            NotificationRepository::create(
                &store,
                NewNotification::to_user(
                    user_id,
                    title,
                    "Body text",
                    crate::models::NotificationKind::Info,
                ),
            )
            .await
            .unwrap();
        }
        let first = store.list_for_user(user_id).await.unwrap().remove(0);
        store.mark_read(first.id).await.unwrap();

        assert_eq!(store.mark_all_read(user_id).await.unwrap(), 2);
        assert_eq!(store.mark_all_read(user_id).await.unwrap(), 0);
    }
}
