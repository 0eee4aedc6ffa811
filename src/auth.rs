//! Identity resolution and the authorization gate.
//!
//! Identity is never ambient: handlers resolve the bearer token once and pass
//! the resulting `Option<CurrentUser>` explicitly into every service call.

use crate::models::{User, UserRole};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// Operations the gate knows how to decide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateEvent,
    /// Direct notifications and event announcements
    BroadcastNotification,
    ManageEvent,
    ManageBudget,
    ViewBudget,
    ManageSchedule,
    ManageRegistrations,
    ReadNotification,
    CancelRegistration,
    /// Anything only requiring a signed-in caller
    Authenticated,
}

impl Action {
    /// Roles allowed to attempt a role-gated action, `None` when not role-gated
    fn allowed_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            Action::CreateEvent => Some(&[UserRole::Organizer, UserRole::Admin]),
            Action::BroadcastNotification => Some(&[UserRole::Admin, UserRole::Organizer]),
            _ => None,
        }
    }
}

/// What an action is performed on, carrying the ids ownership is decided by.
/// Child entities (budget and schedule items) are described by their parent
/// event's organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    None,
    Event { organizer_id: Uuid },
    Notification { recipient_id: Option<Uuid> },
    Registration { registrant_id: Uuid, organizer_id: Uuid },
}

/// Why the gate refused. Unauthenticated and forbidden are distinct kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denied {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden-role")]
    ForbiddenRole,
    #[error("forbidden-owner")]
    ForbiddenOwner,
}

impl Denied {
    pub fn reason(&self) -> &'static str {
        match self {
            Denied::Unauthenticated => "unauthenticated",
            Denied::ForbiddenRole => "forbidden-role",
            Denied::ForbiddenOwner => "forbidden-owner",
        }
    }
}

/// Decide whether `user` may perform `action` on `resource`.
///
/// Rules apply in order: no user, then role, then ownership. Admins pass
/// every ownership check. Nothing is cached between calls.
///
/// # Returns
/// * `Ok(())` when allowed
/// * `Err(Denied)` with the first rule that failed
pub fn authorize(
    user: Option<&CurrentUser>,
    action: Action,
    resource: Resource,
) -> Result<(), Denied> {
    let user = user.ok_or(Denied::Unauthenticated)?;

    if let Some(roles) = action.allowed_roles() {
        if !roles.contains(&user.role) {
            return Err(Denied::ForbiddenRole);
        }
    }

    let owns = match resource {
        Resource::None => true,
        Resource::Event { organizer_id } => user.id == organizer_id || user.is_admin(),
        // Admins do not read other users' inboxes
        Resource::Notification { recipient_id } => recipient_id == Some(user.id),
        Resource::Registration {
            registrant_id,
            organizer_id,
        } => match action {
            Action::CancelRegistration => {
                user.id == registrant_id || user.id == organizer_id || user.is_admin()
            }
            _ => user.id == organizer_id || user.is_admin(),
        },
    };

    if owns {
        Ok(())
    } else {
        Err(Denied::ForbiddenOwner)
    }
}

/// The caller, or `Unauthenticated` when there is none
pub fn require_user(user: Option<&CurrentUser>) -> Result<&CurrentUser, Denied> {
    authorize(user, Action::Authenticated, Resource::None)?;
    user.ok_or(Denied::Unauthenticated)
}

/// Shorthand for actions on an event-owned resource
pub fn authorize_event(
    user: Option<&CurrentUser>,
    action: Action,
    organizer_id: Uuid,
) -> Result<(), Denied> {
    authorize(user, action, Resource::Event { organizer_id })
}

/// Hex SHA-256 digest under which session tokens are stored
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
