use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum RustyGateError {
    // Account errors
    Conflict(String),
    NotFound(String),

    // Credential errors
    InvalidInput(String),
    InvalidCredentials,

    // Token errors
    InvalidToken(String),
    TokenMismatch,

    // Storage errors
    StorageError(String),

    // Configuration errors
    ConfigError(String),

    // System errors
    SystemError(String),
}

impl fmt::Display for RustyGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            Self::TokenMismatch => write!(f, "Refresh token does not match the active session"),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl Error for RustyGateError {}

// Generic result type for RustyGate
pub type Result<T> = std::result::Result<T, RustyGateError>;
