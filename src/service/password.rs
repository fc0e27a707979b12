//! Password hashing off the async workers.
//!
//! Every hash and verify runs on tokio's blocking pool; a semaphore caps
//! how many run at once.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, Params, PasswordHasher as _, PasswordVerifier as _};
use tokio::sync::Semaphore;

use crate::error::ApiError;

/// Argon2id hasher bounded to a fixed number of concurrent jobs.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    permits: Arc<Semaphore>,
}

impl PasswordHasher {
    /// Creates a hasher with the default Argon2id parameters.
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self::with_params(workers, Params::default())
    }

    /// Creates a hasher with explicit Argon2 parameters.
    #[must_use]
    pub fn with_params(workers: usize, params: Params) -> Self {
        Self {
            params,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
    }

    /// Hashes `plain` into a PHC string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if hashing fails or the blocking task
    /// is lost.
    pub async fn hash(&self, plain: String) -> Result<String, ApiError> {
        let params = self.params.clone();
        self.run_blocking(move || {
            let mut salt_bytes = [0u8; 16];
            getrandom::getrandom(&mut salt_bytes)
                .map_err(|e| ApiError::Internal(format!("salt generation failed: {e}")))?;
            let salt = SaltString::encode_b64(&salt_bytes)
                .map_err(|e| ApiError::Internal(format!("salt encoding failed: {e}")))?;
            Self::argon2(params)
                .hash_password(plain.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
        })
        .await?
    }

    /// Checks `plain` against a stored PHC string.
    ///
    /// An unparsable stored hash counts as a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the blocking task is lost.
    pub async fn verify(&self, plain: String, stored: String) -> Result<bool, ApiError> {
        let params = self.params.clone();
        self.run_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&stored) else {
                tracing::warn!("stored password hash is not a valid PHC string");
                return false;
            };
            Self::argon2(params)
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .await
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ApiError::Internal("password worker pool closed".to_string()))?;
        tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| ApiError::Internal(format!("password worker failed: {e}")))
    }
}
