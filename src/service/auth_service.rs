//! Credential check and token issuance for `POST /auth/login`.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::domain::UserId;
use crate::error::ApiError;
use crate::persistence::UserStore;

use super::PasswordHasher;

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated user.
    pub user_id: UserId,
}

/// Authenticates email/password pairs against the user store.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// Creates a new `AuthService`.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Verifies the credentials and issues a token whose subject is the
    /// user's id.
    ///
    /// Unknown email and wrong password are indistinguishable to callers.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] on either mismatch,
    /// [`ApiError::Persistence`] on storage failure and
    /// [`ApiError::Internal`] if signing fails.
    pub async fn authenticate(&self, email: &str, password: String) -> Result<LoginOutcome, ApiError> {
        let Some(record) = self.store.find_by_email(email).await? else {
            tracing::info!("login rejected: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if !self.hasher.verify(password, record.password_hash).await? {
            tracing::info!(user_id = %record.id, "login rejected: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&record.id.to_string())
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        tracing::info!(user_id = %record.id, "login succeeded");
        Ok(LoginOutcome {
            token,
            user_id: record.id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryUserStore, NewUser};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    async fn make_service() -> (AuthService, UserId) {
        let Ok(params) = argon2::Params::new(1024, 1, 1, None) else {
            panic!("valid params");
        };
        let hasher = PasswordHasher::with_params(1, params);
        let store = Arc::new(InMemoryUserStore::new());

        let Ok(password_hash) = hasher.hash("s3cret-pass".to_string()).await else {
            panic!("hash failed");
        };
        let Ok(record) = store
            .create(NewUser {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
                password_hash,
            })
            .await
        else {
            panic!("seed insert failed");
        };

        let Ok(tokens) = TokenService::new(SECRET) else {
            panic!("valid secret");
        };
        (AuthService::new(store, hasher, Arc::new(tokens)), record.id)
    }

    #[tokio::test]
    async fn valid_credentials_issue_token_for_user() {
        let (service, user_id) = make_service().await;
        let Ok(outcome) = service
            .authenticate("grace@example.com", "s3cret-pass".to_string())
            .await
        else {
            panic!("login failed");
        };
        assert_eq!(outcome.user_id, user_id);

        let Ok(tokens) = TokenService::new(SECRET) else {
            panic!("valid secret");
        };
        let subject = tokens.subject_of(&outcome.token);
        assert!(matches!(subject, Ok(ref s) if *s == user_id.to_string()));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (service, _) = make_service().await;
        let result = service
            .authenticate("grace@example.com", "nope".to_string())
            .await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let (service, _) = make_service().await;
        let result = service
            .authenticate("nobody@example.com", "s3cret-pass".to_string())
            .await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }
}
