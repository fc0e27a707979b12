//! User DTOs for registration, single reads and listing.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{Validate, is_plausible_email};
use crate::service::Registration;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 64;
const MAX_NAME_LEN: usize = 50;

/// Request body for `POST /users`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Given name (1-50 chars).
    #[serde(default)]
    pub first_name: String,
    /// Family name (1-50 chars).
    #[serde(default)]
    pub last_name: String,
    /// Login email; must be unique.
    #[serde(default)]
    pub email: String,
    /// Plaintext password (8-64 chars).
    #[serde(default)]
    pub password: String,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_name(&mut errors, "First name", &self.first_name);
        check_name(&mut errors, "Last name", &self.last_name);

        if self.email.trim().is_empty() {
            errors.push("Email cannot be empty".to_string());
        } else if !is_plausible_email(self.email.trim()) {
            errors.push("Email must be a valid email address".to_string());
        }

        let password_len = self.password.chars().count();
        if self.password.is_empty() {
            errors.push("Password cannot be empty".to_string());
        } else if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password_len) {
            errors.push(format!(
                "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_name(errors: &mut Vec<String>, label: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(format!("{label} cannot be empty"));
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        errors.push(format!("{label} must be at most {MAX_NAME_LEN} characters"));
    }
}

impl From<CreateUserRequest> for Registration {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            email: req.email.trim().to_string(),
            password: req.password,
        }
    }
}

/// Query parameters for `GET /users/{id}`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetUserParams {
    /// Comma-separated enrichments; `albums` is the only one recognised.
    #[serde(default)]
    pub include: Option<String>,
}

impl GetUserParams {
    /// Returns `true` if `include` names `albums`.
    #[must_use]
    pub fn wants_albums(&self) -> bool {
        self.include.as_deref().is_some_and(|value| {
            value
                .split(',')
                .any(|part| part.trim().eq_ignore_ascii_case("albums"))
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn valid() -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "difference-engine".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn all_failures_are_reported() {
        let req = CreateUserRequest {
            first_name: " ".to_string(),
            last_name: String::new(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let Err(errors) = req.validate() else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors,
            vec![
                "First name cannot be empty".to_string(),
                "Last name cannot be empty".to_string(),
                "Email must be a valid email address".to_string(),
                "Password must be between 8 and 64 characters".to_string(),
            ]
        );
    }

    #[test]
    fn registration_trims_names_and_email() {
        let mut req = valid();
        req.first_name = "  Ada ".to_string();
        req.email = " ada@example.com ".to_string();
        let registration = Registration::from(req);
        assert_eq!(registration.first_name, "Ada");
        assert_eq!(registration.email, "ada@example.com");
    }

    #[test]
    fn include_albums_is_detected() {
        let params = GetUserParams {
            include: Some("profile, Albums".to_string()),
        };
        assert!(params.wants_albums());
        assert!(!GetUserParams::default().wants_albums());
        let other = GetUserParams {
            include: Some("photos".to_string()),
        };
        assert!(!other.wants_albums());
    }
}
