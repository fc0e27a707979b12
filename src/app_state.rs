//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::{AuthGate, PublicAllowlist, TokenService};
use crate::domain::EventHub;
use crate::persistence::UserStore;
use crate::service::{AlbumsClient, AuthService, PasswordHasher, UserService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// User registration, reads and the creation stream.
    pub user_service: Arc<UserService>,
    /// Credential check and token issuance.
    pub auth_service: Arc<AuthService>,
    /// Event hub, shared with the user service.
    pub event_hub: EventHub,
    /// Authentication gate used by the router middleware.
    pub gate: Arc<AuthGate>,
}

impl AppState {
    /// Wires the services around one store, token service, hasher and hub.
    #[must_use]
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        event_hub: EventHub,
        albums: Option<AlbumsClient>,
        allowlist: PublicAllowlist,
    ) -> Self {
        let user_service = Arc::new(UserService::new(
            Arc::clone(&store),
            hasher.clone(),
            event_hub.clone(),
            albums,
        ));
        let auth_service = Arc::new(AuthService::new(store, hasher, Arc::clone(&tokens)));
        let gate = Arc::new(AuthGate::new(tokens, allowlist));
        Self {
            user_service,
            auth_service,
            event_hub,
            gate,
        }
    }
}
