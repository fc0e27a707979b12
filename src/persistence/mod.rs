//! Persistence layer: user storage behind the [`UserStore`] trait.
//!
//! Two implementations ship: [`InMemoryUserStore`] (default, and used by
//! tests) and [`PostgresUserStore`] backed by `sqlx::PgPool`. Both report
//! a taken unique key as [`StoreError::Duplicate`].

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

pub use memory::InMemoryUserStore;
pub use models::{NewUser, UserRecord};
pub use postgres::PostgresUserStore;

use crate::domain::UserId;

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated; carries the offending key name.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// User storage contract.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new user and returns the stored record.
    ///
    /// # Errors
    ///
    /// [`StoreError::Duplicate`] if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Looks a user up by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on storage failure.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Looks a user up by login email.
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on storage failure.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Returns page `page` (zero-based) of at most `limit` users in
    /// registration order.
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on storage failure.
    async fn list(&self, page: u32, limit: u32) -> Result<Vec<UserRecord>, StoreError>;
}
