//! Account and session identity models.
//!
//! # Invariants
//! - `id` is assigned at signup and preserved across profile edits.
//! - `RegisteredUser` is the only shape that carries a password.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = String;

/// Bio applied to a session user that has none.
pub const DEFAULT_BIO: &str = "Task management enthusiast";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Signed-in user as held by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<DateTime<Utc>>,
}

impl User {
    /// Fills `join_date` and `bio` when the account did not provide them.
    pub fn with_session_defaults(mut self, now: DateTime<Utc>) -> Self {
        if self.join_date.is_none() {
            self.join_date = Some(now);
        }
        if self.bio.is_none() {
            self.bio = Some(DEFAULT_BIO.to_string());
        }
        self
    }

    /// Short "member since" label, e.g. `Mar 2024`, or `Recently` when unknown.
    pub fn member_since(&self) -> String {
        match self.join_date {
            Some(joined) => format!(
                "{} {}",
                MONTH_ABBREVIATIONS[joined.month0() as usize],
                joined.year()
            ),
            None => "Recently".to_string(),
        }
    }
}

/// Ledger entry written at signup.
///
/// Passwords are stored as entered; this is a local mock account system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisteredUser {
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            avatar: None,
            bio: None,
            join_date: None,
        }
    }
}

/// Editable profile fields. `None` leaves a field unchanged; an empty string
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(bio) = &self.bio {
            user.bio = non_empty(bio);
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = non_empty(avatar);
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
