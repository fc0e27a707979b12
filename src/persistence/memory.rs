//! In-process user store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{NewUser, StoreError, UserRecord, UserStore};
use crate::domain::UserId;

/// User store held in memory, in registration order.
///
/// Writes take the outer write lock only for the duplicate check and the
/// push; reads share the lock.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns `true` if no user is stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }
        let record = UserRecord::from_new(UserId::new(), user, Utc::now());
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        let start = (page as usize).saturating_mul(limit as usize);
        Ok(users
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn new_user(n: usize) -> NewUser {
        NewUser {
            first_name: format!("First{n}"),
            last_name: "Last".to_string(),
            email: format!("user{n}@example.com"),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    async fn seeded(count: usize) -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        for n in 0..count {
            let Ok(_) = store.create(new_user(n)).await else {
                panic!("seed insert failed");
            };
        }
        store
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = InMemoryUserStore::new();
        let Ok(record) = store.create(new_user(1)).await else {
            panic!("insert failed");
        };

        let by_id = store.find_by_id(record.id).await;
        assert!(matches!(by_id, Ok(Some(ref r)) if r.email == "user1@example.com"));

        let by_email = store.find_by_email("user1@example.com").await;
        assert!(matches!(by_email, Ok(Some(ref r)) if r.id == record.id));
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = seeded(1).await;
        assert!(matches!(store.find_by_id(UserId::new()).await, Ok(None)));
        assert!(matches!(
            store.find_by_email("nobody@example.com").await,
            Ok(None)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = seeded(1).await;
        let result = store.create(new_user(0)).await;
        assert!(matches!(result, Err(StoreError::Duplicate(ref key)) if key == "email"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn paging_splits_in_order() {
        let store = seeded(5).await;

        let Ok(first) = store.list(0, 2).await else {
            panic!("list failed");
        };
        assert_eq!(first.len(), 2);
        assert_eq!(first.first().map(|u| u.email.as_str()), Some("user0@example.com"));

        let Ok(last) = store.list(2, 2).await else {
            panic!("list failed");
        };
        assert_eq!(last.len(), 1);
        assert_eq!(last.first().map(|u| u.email.as_str()), Some("user4@example.com"));

        let Ok(beyond) = store.list(3, 2).await else {
            panic!("list failed");
        };
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn empty_store_reports_empty() {
        let store = InMemoryUserStore::new();
        assert!(store.is_empty().await);
        assert!(matches!(store.list(0, 10).await, Ok(ref v) if v.is_empty()));
    }
}
