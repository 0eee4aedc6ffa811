use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum! {
    /// Platform role, fixed at signup and only changed by an admin
    pub enum UserRole ("user role") {
        Admin => "admin",
        Organizer => "organizer",
        Participant => "participant",
        Sponsor => "sponsor",
    }
}

/// User profile. Owned by the auth subsystem; this service only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    #[sqlx(rename = "user_role", try_from = "String")]
    #[serde(rename = "user_role")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User (used when seeding stores)
    pub fn new(email: impl Into<String>, full_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            full_name: full_name.into(),
            avatar_url: None,
            role,
            created_at: Utc::now(),
        }
    }

    /// Check if user is an admin
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_as_user_role() {
        let user = User::new("ada@college.edu", "Ada Lovelace", UserRole::Organizer);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_role"], "organizer");
        assert!(!user.is_admin());
    }
}
