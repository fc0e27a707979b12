//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire. Request bodies implement
//! [`Validate`] and are checked by the [`crate::api::extract::ValidJson`]
//! extractor before a handler runs.

pub mod auth_dto;
pub mod common_dto;
pub mod user_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use user_dto::*;
