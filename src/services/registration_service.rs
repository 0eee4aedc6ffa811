use crate::auth::{self, Action, CurrentUser, Resource};
use crate::error::{AppError, AppResult};
use crate::models::{Event, NewRegistration, Registration, RegistrationInput, RegistrationStatus};
use crate::repositories::{EventRepository, RegistrationRepository};
use crate::services::{AdmissionController, EventLocks};
use crate::validation::{schemas, validate};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Registrations of one event with its seat usage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub registrations: Vec<Registration>,
    pub active_count: i64,
    pub capacity: i32,
}

/// Service for registrations
pub struct RegistrationService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    admission: AdmissionController,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        locks: Arc<EventLocks>,
    ) -> Self {
        let admission = AdmissionController::new(events.clone(), registrations.clone(), locks);
        Self {
            events,
            registrations,
            admission,
        }
    }

    /// Register the caller for an event, subject to admission
    pub async fn register(
        &self,
        user: Option<&CurrentUser>,
        payload: &Value,
    ) -> AppResult<Registration> {
        let user = auth::require_user(user)?;
        let input: RegistrationInput = validate(&schemas::registration(), payload)?.parse()?;

        let registration = self
            .admission
            .admit(NewRegistration {
                user_id: user.id,
                event_id: input.event_id,
                ticket_type: input.ticket_type,
                amount_paid: input.amount_paid,
                payment_status: input.payment_status,
                special_requirements: input.special_requirements,
            })
            .await?;

        Ok(registration)
    }

    /// The caller's registrations, newest first
    pub async fn my_registrations(&self, user: Option<&CurrentUser>) -> AppResult<Vec<Registration>> {
        let user = auth::require_user(user)?;
        Ok(self.registrations.list_by_user(user.id).await?)
    }

    /// Attendee list for the organizer or an admin
    pub async fn roster(&self, user: Option<&CurrentUser>, event_id: Uuid) -> AppResult<Roster> {
        auth::require_user(user)?;
        let event = self.event(event_id).await?;
        auth::authorize_event(user, Action::ManageRegistrations, event.organizer_id)?;

        let registrations = self.registrations.list_by_event(event_id).await?;
        let active_count = registrations.iter().filter(|r| r.is_active()).count() as i64;

        Ok(Roster {
            registrations,
            active_count,
            capacity: event.capacity,
        })
    }

    /// Cancel a registration, freeing its seat
    pub async fn cancel(&self, user: Option<&CurrentUser>, id: Uuid) -> AppResult<Registration> {
        auth::require_user(user)?;
        let (registration, event) = self.registration_with_event(id).await?;
        auth::authorize(
            user,
            Action::CancelRegistration,
            Resource::Registration {
                registrant_id: registration.user_id,
                organizer_id: event.organizer_id,
            },
        )?;

        if !registration.is_active() {
            return Err(AppError::BadRequest("Registration is already cancelled".into()));
        }

        let cancelled = self
            .registrations
            .update_status(id, RegistrationStatus::Cancelled)
            .await?;
        info!("Registration cancelled: id={}, event={}", id, event.id);
        Ok(cancelled)
    }

    /// Record attendance at the door
    pub async fn check_in(&self, user: Option<&CurrentUser>, id: Uuid) -> AppResult<Registration> {
        auth::require_user(user)?;
        let (registration, event) = self.registration_with_event(id).await?;
        auth::authorize(
            user,
            Action::ManageRegistrations,
            Resource::Registration {
                registrant_id: registration.user_id,
                organizer_id: event.organizer_id,
            },
        )?;

        if !registration.is_active() {
            return Err(AppError::BadRequest(
                "Cancelled registrations cannot be checked in".into(),
            ));
        }
        if registration.check_in_status {
            return Err(AppError::BadRequest("Attendee is already checked in".into()));
        }

        let checked_in = self.registrations.check_in(id, Utc::now()).await?;
        info!("Attendee checked in: registration={}, event={}", id, event.id);
        Ok(checked_in)
    }

    async fn event(&self, event_id: Uuid) -> AppResult<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn registration_with_event(&self, id: Uuid) -> AppResult<(Registration, Event)> {
        let registration = self
            .registrations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".into()))?;
        let event = self.event(registration.event_id).await?;
        Ok((registration, event))
    }
}
