//! Password hashing and verification
//!
//! Wraps argon2id with per-password random salts. Verification never errors:
//! a mismatch or an unparseable digest both come back as false so callers can
//! map every failure to the same credential error.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use crate::error::{Result, RustyGateError};

/// One-way salted password hasher
#[derive(Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            // Default argon2id parameters: moderate cost, bounded latency
            argon2: Argon2::default(),
        }
    }

    /// Produces a salted one-way digest of the plaintext
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| RustyGateError::SystemError(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a plaintext against a stored digest
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
