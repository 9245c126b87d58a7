//! Authentication and authorization logic.
//!
//! Password hashing, signed access tokens and the role policies that the
//! HTTP layer uses to gate routes.

pub mod jwt;
pub mod password;
pub mod policy;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email or password incorrect")]
    CredentialError,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
