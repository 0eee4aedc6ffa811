//! Registration admission.
//!
//! Admission protects two invariants per event: at most one active
//! registration per user, and never more active registrations than the
//! event's capacity. Requests for the same event are serialized in-process
//! by [`EventLocks`]; the store's `insert_within_capacity` re-checks both
//! invariants atomically, which also covers other server instances.

use crate::error::RepositoryError;
use crate::models::{NewRegistration, Registration};
use crate::repositories::{EventRepository, RegistrationRepository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Domain reasons an admission is refused. Surfaced verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("already-registered")]
    AlreadyRegistered,
    #[error("event-not-found")]
    EventNotFound,
    #[error("capacity-exceeded")]
    CapacityExceeded,
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::AlreadyRegistered => "already-registered",
            Rejection::EventNotFound => "event-not-found",
            Rejection::CapacityExceeded => "capacity-exceeded",
        }
    }
}

/// Admission outcome other than success
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("registration rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The store failed below the domain rules
    #[error("registration store unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for AdmissionError {
    fn from(err: RepositoryError) -> Self {
        AdmissionError::Unavailable(err.to_string())
    }
}

/// One async mutex per event id. Entries nobody holds are pruned on access.
#[derive(Default)]
pub struct EventLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive admission rights on `event_id`
    pub async fn acquire(&self, event_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            // The map holds no invariant a panic could break
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|id, lock| *id == event_id || Arc::strong_count(lock) > 1);
            locks.entry(event_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of events with a live lock entry
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Decides whether a registration may be created
pub struct AdmissionController {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    locks: Arc<EventLocks>,
}

impl AdmissionController {
    /// `locks` is shared with every other writer that must not interleave
    /// with admissions, such as capacity edits
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        locks: Arc<EventLocks>,
    ) -> Self {
        Self {
            events,
            registrations,
            locks,
        }
    }

    /// Admit one registration.
    ///
    /// # Returns
    /// * `Ok(registration)` - inserted with status `confirmed`
    /// * `Err(AdmissionError::Rejected(_))` - duplicate, unknown event, or full
    /// * `Err(AdmissionError::Unavailable(_))` - store failure
    pub async fn admit(&self, request: NewRegistration) -> Result<Registration, AdmissionError> {
        let user_id = request.user_id;
        let event_id = request.event_id;
        let _guard = self.locks.acquire(event_id).await;

        let outcome = self.admit_locked(request).await;
        match &outcome {
            Ok(registration) => info!(
                registration_id = %registration.id,
                %user_id,
                %event_id,
                "Registration admitted"
            ),
            Err(AdmissionError::Rejected(rejection)) => {
                debug!(%user_id, %event_id, reason = rejection.reason(), "Registration rejected")
            }
            Err(AdmissionError::Unavailable(cause)) => {
                error!(%user_id, %event_id, error = %cause, "Registration admission failed")
            }
        }
        outcome
    }

    async fn admit_locked(&self, request: NewRegistration) -> Result<Registration, AdmissionError> {
        if self
            .registrations
            .find_active(request.user_id, request.event_id)
            .await?
            .is_some()
        {
            return Err(Rejection::AlreadyRegistered.into());
        }

        let event = self
            .events
            .find_by_id(request.event_id)
            .await?
            .ok_or(Rejection::EventNotFound)?;

        let active = self.registrations.count_active(event.id).await?;
        if active >= i64::from(event.capacity) {
            return Err(Rejection::CapacityExceeded.into());
        }

        match self.registrations.insert_within_capacity(request).await {
            Ok(Some(registration)) => Ok(registration),
            Ok(None) => Err(Rejection::CapacityExceeded.into()),
            Err(e) if e.is_duplicate() => Err(Rejection::AlreadyRegistered.into()),
            Err(RepositoryError::NotFound(_)) => Err(Rejection::EventNotFound.into()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EventInput, EventStatus, NewEvent, PaymentStatus, RegistrationStatus,
    };
    use crate::repositories::{MemoryStore, RepoResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;

    fn request(user_id: Uuid, event_id: Uuid) -> NewRegistration {
        NewRegistration {
            user_id,
            event_id,
            ticket_type: "general".to_string(),
            amount_paid: Decimal::ZERO,
            payment_status: PaymentStatus::Completed,
            special_requirements: None,
        }
    }

    async fn store_with_event(capacity: i32) -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let event = EventRepository::create(
            &store,
            NewEvent {
                organizer_id: Uuid::new_v4(),
                status: EventStatus::Published,
                input: EventInput {
                    title: "Chess Open".to_string(),
                    description: "Annual inter-college tournament".to_string(),
                    location: "Library".to_string(),
                    start_date: Utc::now() + Duration::days(7),
                    end_date: Utc::now() + Duration::days(8),
                    capacity,
                    price: Decimal::ZERO,
                    category: "competition".to_string(),
                    image_url: None,
                },
            },
        )
        .await
        .unwrap();
        (store, event.id)
    }

    fn controller(store: &MemoryStore) -> AdmissionController {
        AdmissionController::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(EventLocks::new()),
        )
    }

    #[tokio::test]
    async fn test_admitted_registration_is_confirmed() {
        let (store, event_id) = store_with_event(10).await;
        let registration = controller(&store)
            .admit(request(Uuid::new_v4(), event_id))
            .await
            .unwrap();
        assert_eq!(registration.status, RegistrationStatus::Confirmed);
        assert_eq!(registration.event_id, event_id);
    }

    #[tokio::test]
    async fn test_rejections_are_distinct() {
        let (store, event_id) = store_with_event(1).await;
        let admission = controller(&store);
        let user = Uuid::new_v4();

        admission.admit(request(user, event_id)).await.unwrap();

        let again = admission.admit(request(user, event_id)).await.unwrap_err();
        assert!(matches!(
            again,
            AdmissionError::Rejected(Rejection::AlreadyRegistered)
        ));

        let full = admission
            .admit(request(Uuid::new_v4(), event_id))
            .await
            .unwrap_err();
        assert!(matches!(
            full,
            AdmissionError::Rejected(Rejection::CapacityExceeded)
        ));

        let missing = admission
            .admit(request(user, Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(
            missing,
            AdmissionError::Rejected(Rejection::EventNotFound)
        ));

        assert_eq!(store.registrations().unwrap().len(), 1);
    }

    struct BrokenRegistrations;

    #[async_trait]
    impl RegistrationRepository for BrokenRegistrations {
        async fn find_active(&self, _: Uuid, _: Uuid) -> RepoResult<Option<Registration>> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }
        async fn count_active(&self, _: Uuid) -> RepoResult<i64> {
            unreachable!()
        }
        async fn insert_within_capacity(
            &self,
            _: NewRegistration,
        ) -> RepoResult<Option<Registration>> {
            unreachable!()
        }
        async fn find_by_id(&self, _: Uuid) -> RepoResult<Option<Registration>> {
            unreachable!()
        }
        async fn list_by_event(&self, _: Uuid) -> RepoResult<Vec<Registration>> {
            unreachable!()
        }
        async fn list_by_user(&self, _: Uuid) -> RepoResult<Vec<Registration>> {
            unreachable!()
        }
        async fn update_status(
            &self,
            _: Uuid,
            _: RegistrationStatus,
        ) -> RepoResult<Registration> {
            unreachable!()
        }
        async fn check_in(&self, _: Uuid, _: DateTime<Utc>) -> RepoResult<Registration> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable_not_a_rejection() {
        let (store, event_id) = store_with_event(5).await;
        let admission = AdmissionController::new(
            Arc::new(store),
            Arc::new(BrokenRegistrations),
            Arc::new(EventLocks::new()),
        );

        let err = admission
            .admit(request(Uuid::new_v4(), event_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_event_locks_are_pruned_once_released() {
        let locks = EventLocks::new();
        let first = Uuid::new_v4();

        let guard = locks.acquire(first).await;
        drop(locks.acquire(Uuid::new_v4()).await);
        assert_eq!(locks.tracked(), 2);

        drop(guard);
        drop(locks.acquire(Uuid::new_v4()).await);
        assert_eq!(locks.tracked(), 1);
    }
}
