//! Access gate: bearer token verification, role policies and ownership.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use alumni_core::auth::jwt::TokenClaims;
use alumni_core::auth::policy::{RolePolicy, owns_or_admin};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Extract the token from an `Authorization` value. The scheme is matched
/// case-insensitively and the token must be non-empty.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() && !token.contains(' '))
        .then_some(token)
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;

    let token = parse_bearer(header)
        .ok_or_else(|| AppError::Unauthorized("invalid authorization scheme".into()))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!(error = %e, "rejected bearer token");
        AppError::Unauthorized("invalid or expired token".into())
    })?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

fn check_role(request: &Request, policy: RolePolicy) -> AppResult<()> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("authentication required".into()))?;
    if !policy.allows(&user.0.role) {
        return Err(AppError::Forbidden(
            "your role is not allowed to access this resource".into(),
        ));
    }
    Ok(())
}

/// Role gate: administrators only. Must run after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    check_role(&request, RolePolicy::AdminOnly)?;
    Ok(next.run(request).await)
}

/// Role gate: `user` or `admin`. Must run after [`require_auth`].
pub async fn require_user_or_admin(request: Request, next: Next) -> Result<Response, AppError> {
    check_role(&request, RolePolicy::UserOrAdmin)?;
    Ok(next.run(request).await)
}

/// Ownership gate for a target alumni id; administrators bypass it.
pub fn ensure_owner_or_admin(caller: &TokenClaims, owner: Uuid) -> AppResult<()> {
    if owns_or_admin(caller.sub, &caller.role, owner) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you may only access your own records".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("BEARER abc"), Some("abc"));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(parse_bearer(""), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer("Token abc"), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
    }

    #[test]
    fn ownership_gate() {
        let me = Uuid::now_v7();
        let user = TokenClaims::new(me, "u@example.com", "user");
        let admin = TokenClaims::new(Uuid::now_v7(), "a@example.com", "admin");
        assert!(ensure_owner_or_admin(&user, me).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&user, Uuid::now_v7()),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_owner_or_admin(&admin, me).is_ok());
    }
}
