//! Authentication and authorization.
//!
//! - [`TokenService`] issues and verifies HS256 bearer tokens.
//! - [`AuthGate`] classifies every inbound request as bypassed,
//!   authenticated or rejected, and [`require_authentication`] applies it
//!   as axum middleware.
//! - [`Principal`] is the request-scoped identity the gate attaches.
//! - [`policy`] holds the ownership checks handlers call explicitly.

pub mod gate;
pub mod policy;
pub mod principal;
pub mod token;

pub use gate::{AuthGate, GateDecision, PublicAllowlist, RejectReason, require_authentication};
pub use policy::authorize_owner;
pub use principal::Principal;
pub use token::{Claims, TokenConfigError, TokenError, TokenService};
