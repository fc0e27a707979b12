//! Service layer: business logic orchestration.
//!
//! [`UserService`] coordinates registration and reads, hashes passwords
//! through the bounded [`PasswordHasher`], and emits events through the
//! [`super::domain::EventHub`]. [`AuthService`] turns credentials into
//! bearer tokens. [`AlbumsClient`] is the optional downstream enrichment.

pub mod albums;
pub mod auth_service;
pub mod password;
pub mod user_service;

pub use albums::AlbumsClient;
pub use auth_service::{AuthService, LoginOutcome};
pub use password::PasswordHasher;
pub use user_service::{Registration, UserService};
