//! Stateless bearer tokens.
//!
//! Tokens are JWTs signed with HMAC-SHA256 over the claims
//! `{sub, iat, exp}`. Validity depends only on the signature and the
//! expiry; there is no revocation list, so a leaked token stays usable
//! until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Minimum secret length in bytes for HS256 (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Token lifetime in seconds used unless overridden.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id as a string.
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Signing key misconfiguration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum TokenConfigError {
    /// No secret configured.
    #[error("token secret is not configured")]
    MissingSecret,

    /// Secret shorter than the HS256 minimum.
    #[error("token secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    SecretTooShort(usize),

    /// Non-positive token lifetime.
    #[error("token ttl must be positive")]
    InvalidTtl,
}

/// Per-call token failures. Never fatal; the caller treats them as
/// "not authenticated".
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Wrong shape, bad base64, bad JSON or missing claims.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the configured key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// `exp` is not in the future.
    #[error("token expired")]
    Expired,

    /// Signing a new token failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and verifies bearer tokens with a key derived from a shared
/// secret. Any instance holding the same secret accepts the same tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Builds the service from the configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenConfigError`] if the secret is empty or shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: &str) -> Result<Self, TokenConfigError> {
        if secret.is_empty() {
            return Err(TokenConfigError::MissingSecret);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenConfigError::SecretTooShort(secret.len()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` with a zero-leeway strict
        // comparison against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
        })
    }

    /// Replaces the token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenConfigError::InvalidTtl`] for a zero or negative
    /// lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Result<Self, TokenConfigError> {
        if ttl <= Duration::zero() {
            return Err(TokenConfigError::InvalidTtl);
        }
        self.ttl = ttl;
        Ok(self)
    }

    /// Token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `subject`, valid from now for one TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] if the token is malformed, badly signed or
    /// expired.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature and expiry as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Same as [`TokenService::verify`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;
        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }

    /// Returns the verified subject of `token`.
    ///
    /// # Errors
    ///
    /// Same as [`TokenService::verify`].
    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|claims| claims.sub)
    }
}
