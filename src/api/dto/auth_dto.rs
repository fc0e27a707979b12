//! Login DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::{Validate, is_plausible_email};
use crate::domain::UserId;

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthenticationRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl Validate for AuthenticationRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("Email cannot be empty".to_string());
        } else if !is_plausible_email(email) {
            errors.push("Email must be a valid email address".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password cannot be empty".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Response body for a successful login. The token is also returned in
/// the `Authorization` header.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    /// Authenticated user id.
    pub user_id: UserId,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}
