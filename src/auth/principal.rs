//! Request-scoped authenticated identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// The identity established by [`super::AuthGate`] for one request.
///
/// Inserted into the request extensions by the gate and read back by
/// handlers through this type's extractor. It only lives as long as the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
}

impl Principal {
    /// Wraps a verified token subject.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// The verified token subject (a user id string).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}
