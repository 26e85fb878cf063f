//! In-memory user store for development and testing
//!
//! Keeps all user records in memory behind async locks. Suitable for
//! development, testing, or small single-node deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::UserStore;
use crate::auth::user::User;
use crate::error::{Result, RustyGateError};

/// In-memory user storage with an email uniqueness index
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    email_index: Arc<RwLock<HashMap<String, String>>>, // email -> user_id
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: User) -> Result<User> {
        // Check-then-insert under the index write lock so two concurrent
        // sign-ups with the same email cannot both succeed
        let mut email_index = self.email_index.write().await;
        if email_index.contains_key(&user.email) {
            return Err(RustyGateError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        email_index.insert(user.email.clone(), user.id.clone());
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email_index = self.email_index.read().await;
        let users = self.users.read().await;

        Ok(email_index.get(email).and_then(|id| users.get(id)).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn update_refresh_hash(&self, id: &str, hash: Option<String>) -> Result<()> {
        let mut users = self.users.write().await;

        if let Some(user) = users.get_mut(id) {
            user.refresh_token_hash = hash;
            Ok(())
        } else {
            Err(RustyGateError::NotFound(format!("User {} not found", id)))
        }
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let mut email_index = self.email_index.write().await;
        let mut users = self.users.write().await;

        if let Some(user) = users.remove(id) {
            email_index.remove(&user.email);
            Ok(())
        } else {
            Err(RustyGateError::NotFound(format!("User {} not found", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(email.to_string(), "Test".to_string(), "digest".to_string())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let created = store.create_user(user("alice@example.com")).await.unwrap();

        let by_email = store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create_user(user("alice@example.com")).await.unwrap();

        let result = store.create_user(user("alice@example.com")).await;
        assert!(matches!(result, Err(RustyGateError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_refresh_hash() {
        let store = MemoryUserStore::new();
        let created = store.create_user(user("alice@example.com")).await.unwrap();

        store
            .update_refresh_hash(&created.id, Some("fingerprint".to_string()))
            .await
            .unwrap();
        let loaded = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.refresh_token_hash.as_deref(), Some("fingerprint"));

        store.update_refresh_hash(&created.id, None).await.unwrap();
        let loaded = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert!(loaded.refresh_token_hash.is_none());

        let result = store
            .update_refresh_hash("missing-id", Some("fingerprint".to_string()))
            .await;
        assert!(matches!(result, Err(RustyGateError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_frees_email() {
        let store = MemoryUserStore::new();
        let created = store.create_user(user("alice@example.com")).await.unwrap();

        store.delete_user(&created.id).await.unwrap();
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());

        // Email can be registered again after deletion
        store.create_user(user("alice@example.com")).await.unwrap();

        let result = store.delete_user("missing-id").await;
        assert!(matches!(result, Err(RustyGateError::NotFound(_))));
    }
}
