//! User service: registration, reads, paging and the creation stream.

use std::sync::Arc;

use crate::domain::{EventHub, Subscription, UserEvent, UserId, UserProfile};
use crate::error::ApiError;
use crate::persistence::{NewUser, UserStore};

use super::{AlbumsClient, PasswordHasher};

/// Fields accepted when registering a user. The password is plaintext
/// here and never leaves this service unhashed.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Orchestration layer for user operations.
///
/// Every registration follows the same path: hash off the async workers,
/// insert, publish a `UserCreated` event, return the public projection.
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    hub: EventHub,
    albums: Option<AlbumsClient>,
}

impl UserService {
    /// Creates a new `UserService`. Pass `None` for `albums` to disable
    /// enrichment.
    #[must_use]
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        hub: EventHub,
        albums: Option<AlbumsClient>,
    ) -> Self {
        Self {
            store,
            hasher,
            hub,
            albums,
        }
    }

    /// Returns a reference to the inner [`EventHub`].
    #[must_use]
    pub fn event_hub(&self) -> &EventHub {
        &self.hub
    }

    /// Registers a user and announces it to stream subscribers.
    ///
    /// # Errors
    ///
    /// [`ApiError::Conflict`] if the email is taken, [`ApiError::Persistence`]
    /// on storage failure, [`ApiError::Internal`] if hashing fails.
    pub async fn create_user(&self, registration: Registration) -> Result<UserProfile, ApiError> {
        let password_hash = self.hasher.hash(registration.password).await?;
        let record = self
            .store
            .create(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                password_hash,
            })
            .await?;

        let user = UserProfile::from(record);
        let user_id = user.id;
        let reached = self.hub.publish(UserEvent::created(user.clone()));

        tracing::info!(%user_id, subscribers = reached, "user created");
        Ok(user)
    }

    /// Fetches one user's public projection.
    ///
    /// Ownership is not checked here; callers apply the policy to the
    /// returned value.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, ApiError> {
        let record = self.store.find_by_id(id).await?;
        Ok(record.map(UserProfile::from))
    }

    /// Attaches the user's albums when enrichment is configured and the
    /// albums service answers. Otherwise `albums` stays absent.
    pub async fn with_albums(&self, mut user: UserProfile) -> UserProfile {
        if let Some(client) = &self.albums {
            user.albums = client.albums_for(user.id).await;
        }
        user
    }

    /// Returns one zero-based page of users in registration order.
    ///
    /// # Errors
    ///
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<UserProfile>, ApiError> {
        let records = self.store.list(page, limit).await?;
        Ok(records.into_iter().map(UserProfile::from).collect())
    }

    /// Opens a live subscription to user creation events.
    #[must_use]
    pub fn stream_users(&self) -> Subscription {
        self.hub.subscribe()
    }
}
