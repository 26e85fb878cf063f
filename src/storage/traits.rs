//! Abstract user record store for pluggable backends
//!
//! The auth core only ever touches user records through this trait, so the
//! in-memory implementation can be swapped for a database-backed one without
//! touching the session logic.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::user::User;
use crate::error::Result;

/// User record storage interface
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user. Fails with `Conflict` if the email is already registered.
    async fn create_user(&self, user: User) -> Result<User>;

    /// Get user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Set or clear the user's stored refresh-token fingerprint.
    /// Fails with `NotFound` for an unknown id.
    async fn update_refresh_hash(&self, id: &str, hash: Option<String>) -> Result<()>;

    /// Delete a user. Fails with `NotFound` for an unknown id.
    async fn delete_user(&self, id: &str) -> Result<()>;
}

/// Shared reference to a user store
pub type SharedUserStore = Arc<dyn UserStore>;
