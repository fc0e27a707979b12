//! Ownership-based authorization.
//!
//! Policies are plain functions called by handlers at a fixed point in the
//! pipeline. Single-user reads use [`authorize_owner`] *after* the user has
//! been fetched, so a rejected request still costs one storage read.

use super::Principal;
use crate::domain::{UserId, UserProfile};
use crate::error::ApiError;

/// Post-fetch ownership check for a single-user read.
///
/// - A `requested` id other than the principal's subject fails, whether or
///   not anything was fetched, so a non-owner cannot tell existing ids from
///   missing ones.
/// - For the owner, the fetched value passes through untouched; the caller
///   maps `None` to 404.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] when the principal does not own the
/// requested id.
pub fn authorize_owner(
    principal: &Principal,
    requested: UserId,
    fetched: Option<UserProfile>,
) -> Result<Option<UserProfile>, ApiError> {
    if !requested.matches_subject(principal.subject()) {
        tracing::info!(
            subject = principal.subject(),
            user_id = %requested,
            found = fetched.is_some(),
            "ownership check denied read"
        );
        return Err(ApiError::Forbidden);
    }
    Ok(fetched.filter(|profile| profile.id == requested))
}
