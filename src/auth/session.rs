//! Session lifecycle orchestration
//!
//! The session manager combines the user store, password hasher and token
//! issuer to drive sign-up, sign-in, sign-out and refresh. The only
//! server-side session state is the refresh-token fingerprint stored on the
//! user record: every sign-in/refresh overwrites it (rotation) and sign-out
//! clears it (revocation). Transport concerns stay out of this module:
//! operations return a cookie directive for the adapter to apply, never a
//! response object.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::auth::password::PasswordHasher;
use crate::auth::token::{TokenIssuer, TokenKind, TokenPair};
use crate::auth::user::{SignInRequest, SignUpRequest, User};
use crate::constants::MIN_AUTH_LATENCY_MS;
use crate::error::{Result, RustyGateError};
use crate::security::{constant_time_eq, AuthTimer};
use crate::storage::SharedUserStore;

/// Instruction for the transport adapter's refresh cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieDirective {
    /// Set the refresh cookie to this value with the given Max-Age
    Set { value: String, max_age_secs: u64 },
    /// Remove the refresh cookie
    Clear,
}

/// Result of a session operation: response body fields plus a cookie directive
#[derive(Debug, Serialize)]
pub struct AuthOutcome {
    pub message: String,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Applied by the transport adapter, never serialized into the body
    #[serde(skip_serializing)]
    pub cookie: CookieDirective,
}

/// Stored form of a refresh token: a base64url SHA-256 fingerprint.
/// The raw token never touches the store.
pub fn token_fingerprint(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

/// Orchestrates the account/session state machine over injected collaborators
pub struct SessionManager {
    store: SharedUserStore,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    cookie_max_age: Duration,
    /// Per-user write locks: concurrent rotations race on a single refresh
    /// slot, so every write to it is serialized per user id
    user_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionManager {
    pub fn new(
        store: SharedUserStore,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        cookie_max_age: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            issuer,
            cookie_max_age,
            user_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new account and opens its first session
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthOutcome> {
        if self.store.find_by_email(&request.email).await?.is_some() {
            return Err(RustyGateError::Conflict(format!(
                "User with email {} already exists",
                request.email
            )));
        }

        if request.password != request.confirm_password {
            return Err(RustyGateError::InvalidInput(
                "Passwords do not match".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .store
            .create_user(User::new(request.email, request.name, password_hash))
            .await?;

        let _guard = self.lock_user(&user.id).await;
        let pair = self.rotate_session(&user).await?;

        log::info!("New user signed up: {}", user.id);
        Ok(self.session_outcome("New user signed up", pair))
    }

    /// Verifies credentials and opens a session, replacing any prior one
    pub async fn sign_in(&self, request: SignInRequest) -> Result<AuthOutcome> {
        // Pad the credential check so unknown-email and wrong-password
        // failures take the same time
        let timer = AuthTimer::new(Duration::from_millis(MIN_AUTH_LATENCY_MS));
        let checked = self.check_credentials(&request.email, &request.password).await;
        timer.wait().await;
        let user = checked?;

        let _guard = self.lock_user(&user.id).await;
        let pair = self.rotate_session(&user).await?;

        log::info!("User signed in: {}", user.id);
        Ok(self.session_outcome("Signed in", pair))
    }

    /// Revokes the active session matching the presented refresh token
    pub async fn sign_out(&self, refresh_token: Option<&str>) -> Result<AuthOutcome> {
        let token = require_token(refresh_token)?;
        let claims = self.issuer.verify(token, TokenKind::Refresh)?;

        let _guard = self.lock_user(&claims.sub).await;
        let user = self.verify_active_session(&claims.sub, token).await?;
        self.store.update_refresh_hash(&user.id, None).await?;

        log::info!("User signed out: {}", user.id);
        Ok(AuthOutcome {
            message: "Signed out".to_string(),
            access_token: None,
            cookie: CookieDirective::Clear,
        })
    }

    /// Exchanges a valid refresh token for a fresh pair. The presented token
    /// is unusable afterwards even if not yet expired.
    pub async fn refresh_tokens(&self, refresh_token: Option<&str>) -> Result<AuthOutcome> {
        let token = require_token(refresh_token)?;
        let claims = self.issuer.verify(token, TokenKind::Refresh)?;

        let _guard = self.lock_user(&claims.sub).await;
        let user = self.verify_active_session(&claims.sub, token).await?;
        let pair = self.rotate_session(&user).await?;

        log::debug!("Rotated refresh token for user {}", user.id);
        Ok(self.session_outcome("Tokens refreshed", pair))
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| RustyGateError::NotFound(format!("No user with email {}", email)))?;

        if !self.hasher.verify(password, &user.password_hash) {
            log::warn!("Failed sign-in attempt for user {}", user.id);
            return Err(RustyGateError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Verification order is fixed: user exists, then a session hash is
    /// present, then the fingerprint matches. Each step short-circuits with
    /// its own error kind so callers can tell "never signed in" from
    /// "replayed stale token".
    async fn verify_active_session(&self, user_id: &str, presented: &str) -> Result<User> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RustyGateError::NotFound(format!("User {} not found", user_id)))?;

        if !user.has_session() {
            return Err(RustyGateError::NotFound(format!(
                "No active session for user {}",
                user_id
            )));
        }

        let stored = user.refresh_token_hash.as_deref().unwrap_or_default();
        if !constant_time_eq(&token_fingerprint(presented), stored) {
            log::warn!("Stale or replayed refresh token for user {}", user_id);
            return Err(RustyGateError::TokenMismatch);
        }

        Ok(user)
    }

    /// Issues a new pair and persists the fingerprint of its refresh token
    async fn rotate_session(&self, user: &User) -> Result<TokenPair> {
        let pair = self.issuer.issue(user).await?;
        self.store
            .update_refresh_hash(&user.id, Some(token_fingerprint(&pair.refresh_token)))
            .await?;
        Ok(pair)
    }

    fn session_outcome(&self, message: &str, pair: TokenPair) -> AuthOutcome {
        AuthOutcome {
            message: message.to_string(),
            access_token: Some(pair.access_token),
            cookie: CookieDirective::Set {
                value: pair.refresh_token,
                max_age_secs: self.cookie_max_age.as_secs(),
            },
        }
    }

    async fn lock_user(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.user_locks.write().await;
            Arc::clone(
                locks
                    .entry(id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

fn require_token(token: Option<&str>) -> Result<&str> {
    match token {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(RustyGateError::InvalidInput(
            "No refresh token provided".to_string(),
        )),
    }
}
