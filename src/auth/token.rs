//! Token pair issuance and verification
//!
//! Access and refresh tokens share one claim shape but are signed with
//! independent secrets and lifetimes, so a leaked token cannot be replayed
//! across purposes. Claims carry identity and status only; credential
//! material such as the password hash must never be signed into a token.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::user::User;
use crate::error::{Result, RustyGateError};

/// JWT claims: identity and account status, nothing else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email address
    pub email: String,
    /// Account active flag
    pub is_active: bool,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

impl Claims {
    /// Creates claims for a user with the given lifetime
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = chrono::Utc::now().timestamp() as usize;
        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            exp: now + ttl.as_secs() as usize,
            iat: now,
        }
    }
}

/// Which secret/lifetime a token was signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// A freshly signed access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies token pairs with independent access/refresh secrets
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates an issuer from the two secrets and their lifetimes
    pub fn new(
        access_secret: &str,
        access_ttl: Duration,
        refresh_secret: &str,
        refresh_ttl: Duration,
    ) -> Self {
        // No expiry leeway: a token is invalid the instant it expires
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            access_ttl,
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_ttl,
            validation,
        }
    }

    /// Signs an access/refresh pair for the user.
    ///
    /// The two signatures are independent, so they run concurrently on the
    /// blocking pool and the caller waits for both.
    pub async fn issue(&self, user: &User) -> Result<TokenPair> {
        let access_claims = Claims::new(user, self.access_ttl);
        let refresh_claims = Claims::new(user, self.refresh_ttl);
        let access_key = self.access_encoding.clone();
        let refresh_key = self.refresh_encoding.clone();

        let access = tokio::task::spawn_blocking(move || {
            encode(&Header::default(), &access_claims, &access_key)
        });
        let refresh = tokio::task::spawn_blocking(move || {
            encode(&Header::default(), &refresh_claims, &refresh_key)
        });

        let (access, refresh) = tokio::try_join!(access, refresh)
            .map_err(|e| RustyGateError::SystemError(format!("Signing task failed: {}", e)))?;

        Ok(TokenPair {
            access_token: access.map_err(|e| {
                RustyGateError::SystemError(format!("Failed to sign access token: {}", e))
            })?,
            refresh_token: refresh.map_err(|e| {
                RustyGateError::SystemError(format!("Failed to sign refresh token: {}", e))
            })?,
        })
    }

    /// Validates a token against the secret matching `kind` and decodes its
    /// claims. Bad signature, malformed payload and past expiry all surface
    /// as the same `InvalidToken` kind.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| RustyGateError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(
            "access-unit-secret-0123456789-0123456789",
            Duration::from_secs(900),
            "refresh-unit-secret-0123456789-0123456789",
            Duration::from_secs(3600),
        )
    }

    fn test_user() -> User {
        User::new(
            "alice@example.com".to_string(),
            "Alice".to_string(),
            "digest".to_string(),
        )
    }

    #[tokio::test]
    async fn test_issue_and_verify_round_trip() {
        let issuer = test_issuer();
        let user = test_user();

        let pair = issuer.issue(&user).await.unwrap();
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = issuer.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.email, user.email);
        assert!(access.is_active);

        let refresh = issuer
            .verify(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.sub, user.id);
        assert!(refresh.exp > access.exp);
    }

    #[tokio::test]
    async fn test_cross_kind_verification_fails() {
        let issuer = test_issuer();
        let pair = issuer.issue(&test_user()).await.unwrap();

        // An access token must not verify against the refresh secret and vice versa
        let result = issuer.verify(&pair.access_token, TokenKind::Refresh);
        assert!(matches!(result, Err(RustyGateError::InvalidToken(_))));

        let result = issuer.verify(&pair.refresh_token, TokenKind::Access);
        assert!(matches!(result, Err(RustyGateError::InvalidToken(_))));
    }

    #[test]
    fn test_malformed_token_fails() {
        let issuer = test_issuer();
        for garbled in ["", "not.a.token", "invalid"] {
            let result = issuer.verify(garbled, TokenKind::Access);
            assert!(matches!(result, Err(RustyGateError::InvalidToken(_))));
        }
    }

    #[test]
    fn test_expired_token_fails() {
        let issuer = test_issuer();
        let user = test_user();

        let mut claims = Claims::new(&user, Duration::from_secs(900));
        claims.exp = claims.iat - 3600; // expired an hour ago
        let token = encode(&Header::default(), &claims, &issuer.access_encoding).unwrap();

        let result = issuer.verify(&token, TokenKind::Access);
        assert!(matches!(result, Err(RustyGateError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_claims_carry_no_credential_material() {
        let issuer = test_issuer();
        let mut user = test_user();
        user.password_hash = "super-secret-digest".to_string();

        let pair = issuer.issue(&user).await.unwrap();
        // Claims segment is plain base64url; the digest must not appear in it
        let claims = issuer.verify(&pair.access_token, TokenKind::Access).unwrap();
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("super-secret-digest"));
    }
}
