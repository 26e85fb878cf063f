//! Rusty Gate - A lightweight JWT authentication service implemented in Rust
//!
//! This library provides account creation, credential verification, and
//! session continuity via rotating access/refresh token pairs.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
