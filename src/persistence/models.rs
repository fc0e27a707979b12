//! Storage models for users.

use chrono::{DateTime, Utc};

use crate::domain::{UserId, UserProfile};

/// A stored row from the `users` table.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Primary key.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email (unique).
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl UserRecord {
    /// Builds the record for a freshly inserted user.
    #[must_use]
    pub fn from_new(id: UserId, user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at,
        }
    }
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            albums: None,
        }
    }
}
