use serde::{Deserialize, Serialize};

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user identifier (UUID v4)
    pub id: String,
    /// Email address, unique across the store
    pub email: String,
    /// Display name
    pub name: String,
    /// Salted one-way password digest, never serialized out
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Fingerprint of the currently active refresh token.
    /// This is the only server-side session state: one slot per user,
    /// overwritten on every sign-in/refresh and cleared on sign-out.
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,
    /// Whether the account is active
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Creates a new active user with a freshly generated id
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            password_hash,
            refresh_token_hash: None,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    /// True if the user currently holds an active refresh session
    pub fn has_session(&self) -> bool {
        self.refresh_token_hash
            .as_deref()
            .map_or(false, |h| !h.is_empty())
    }
}

/// Sign-up request payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-in request payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}
