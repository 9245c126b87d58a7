//! Authentication service: login, profile lookup and the API-key alumni check.

use serde::Serialize;
use tracing::{info, warn};

use alumni_core::auth::AuthError;
use alumni_core::auth::jwt::{TokenClaims, TokenService};
use alumni_core::auth::password::verify_password;
use alumni_core::models::Alumni;
use alumni_core::store::Store;

use crate::error::{AppError, AppResult};

/// Body of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub alumni: Alumni,
    pub token: String,
}

/// Body of `GET /profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub role: String,
    pub alumni: Option<Alumni>,
}

/// Authenticate with email + password and issue an access token.
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    store: &Store,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> AppResult<LoginResponse> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("email and password are required".into()));
    }

    let Some(alumni) = store.alumni.find_by_email(&email).await? else {
        warn!(email = %email, "login failed: unknown email");
        return Err(AuthError::CredentialError.into());
    };
    if !verify_password(password, &alumni.password_hash) {
        warn!(email = %email, "login failed: wrong password");
        return Err(AuthError::CredentialError.into());
    }

    let token = tokens.issue(alumni.id, &alumni.email, &alumni.role)?;
    info!(alumni_id = %alumni.id, role = %alumni.role, "login succeeded");
    Ok(LoginResponse { alumni, token })
}

/// The caller's identity from the token plus the stored record, if it still exists.
pub async fn profile(store: &Store, claims: &TokenClaims) -> AppResult<ProfileResponse> {
    let alumni = store.alumni.get(claims.sub).await?;
    Ok(ProfileResponse {
        id: claims.sub,
        email: claims.email.clone(),
        role: claims.role.clone(),
        alumni,
    })
}

/// Verify the shared API key. An unconfigured key rejects everything.
pub fn check_api_key(configured: Option<&str>, presented: &str) -> AppResult<()> {
    match configured {
        Some(key) if constant_time_eq(key.as_bytes(), presented.as_bytes()) => Ok(()),
        _ => Err(AppError::Unauthorized("invalid API key".into())),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
