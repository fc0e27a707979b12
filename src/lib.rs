//! # users-gateway
//!
//! REST and server-sent-events gateway for user accounts.
//!
//! Every request passes a stateless bearer-token gate; single-user reads
//! are checked against the caller's identity after the fetch; user
//! creation is fanned out to live `/users/stream` subscribers through an
//! in-process broadcast hub.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, SSE)
//!     │
//!     ├── AuthGate middleware (auth/)
//!     ├── REST + SSE Handlers (api/)
//!     │       └── ownership policy (auth/policy)
//!     │
//!     ├── UserService / AuthService (service/)
//!     │       ├── PasswordHasher (blocking pool)
//!     │       └── AlbumsClient (optional enrichment)
//!     ├── EventHub (domain/)
//!     │
//!     └── UserStore (persistence/: in-memory or PostgreSQL)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
