//! Public user projection and album enrichment types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// The public face of a user account: everything a client may see.
///
/// Password material never reaches this type; it is built from a stored
/// record by dropping the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Albums from the albums service, present only when requested and
    /// available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<Album>>,
}

/// Album summary returned by the downstream albums service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Album identifier as assigned by the albums service.
    #[serde(alias = "albumId")]
    pub id: String,
    /// Album title.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}
