//! Domain models for the college events backend.
//!
//! One canonical record shape per entity. Enumerated columns are stored as
//! TEXT and decoded into the enums below, so an unknown value in the store
//! surfaces as a decode error instead of silently defaulting.

use thiserror::Error;

/// Raised when a stored or submitted value is not a known enum variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a TEXT-backed enum with its wire spelling.
///
/// Generates `as_str`, `ALL`, `FromStr`, `TryFrom<String>` (used by the
/// `FromRow` derives) and `Display`.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire and column spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Wire spellings of every variant
            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, $crate::models::ParseEnumError> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::models::ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::ParseEnumError;

            fn try_from(s: String) -> Result<Self, $crate::models::ParseEnumError> {
                s.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Decode a TEXT column into one of the enums above
pub(crate) fn decode_text<T>(column: &str, value: String) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    value.parse().map_err(|e: ParseEnumError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub mod budget;
pub mod event;
pub mod notification;
pub mod registration;
pub mod schedule;
pub mod user;

pub use budget::{
    BudgetCategory, BudgetItem, BudgetItemChanges, BudgetItemInput, BudgetItemStatus,
    BudgetSummary, CategoryTotals, NewBudgetItem,
};
pub use event::{Event, EventChanges, EventFilter, EventInput, EventStatus, NewEvent};
pub use notification::{
    AnnouncementInput, NewNotification, Notification, NotificationInput, NotificationKind,
    TargetAudience,
};
pub use registration::{
    NewRegistration, PaymentStatus, Registration, RegistrationInput, RegistrationStatus,
};
pub use schedule::{
    NewScheduleItem, ScheduleItem, ScheduleItemChanges, ScheduleItemInput, ScheduleStatus,
};
pub use user::{User, UserRole};
