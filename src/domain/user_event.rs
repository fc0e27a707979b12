//! Domain events reflecting user lifecycle changes.
//!
//! Every successful registration emits a [`UserEvent`] through the
//! [`super::EventHub`]. Events are pushed to `/users/stream` subscribers
//! as the user's public projection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{UserId, UserProfile};

/// Domain event emitted after a user mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum UserEvent {
    /// Emitted when a new user is registered.
    UserCreated {
        /// Public projection of the new user.
        user: UserProfile,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl UserEvent {
    /// Builds a `UserCreated` event stamped with the current time.
    #[must_use]
    pub fn created(user: UserProfile) -> Self {
        Self::UserCreated {
            user,
            timestamp: Utc::now(),
        }
    }

    /// Returns the user ID associated with this event.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::UserCreated { user, .. } => user.id,
        }
    }

    /// Returns the public projection carried by the event.
    #[must_use]
    pub fn user(&self) -> &UserProfile {
        match self {
            Self::UserCreated { user, .. } => user,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::UserCreated { .. } => "user_created",
        }
    }
}
