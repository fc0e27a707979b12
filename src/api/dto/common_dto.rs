//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (zero-based). `offset` is accepted as an alias.
    #[serde(default, alias = "offset")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 50.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl PaginationParams {
    /// Clamps `limit` into `1..=100`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page,
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

/// Field-level validation for request bodies. Implementations report every
/// failing field, not just the first.
pub trait Validate {
    /// Returns all validation messages, or `Ok(())` if the value is valid.
    ///
    /// # Errors
    ///
    /// The collected messages when at least one field is invalid.
    fn validate(&self) -> Result<(), Vec<String>>;
}

/// Minimal structural email check: one `@`, non-empty local part, and a
/// dotted domain without empty labels.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
