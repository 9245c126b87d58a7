//! Application error types.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use alumni_core::auth::AuthError;
use alumni_core::jobs::LifecycleError;
use alumni_core::models::InvalidInput;
use alumni_core::store::StoreError;
use alumni_core::uploads::UploadError;

use crate::response::ApiResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// State or uniqueness conflict. Reported as 400.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Validation(m)
            | AppError::Conflict(m)
            | AppError::NotFound(m)
            | AppError::Unauthorized(m)
            | AppError::Forbidden(m) => m,
            AppError::Internal(m) => {
                error!(error = %m, "internal error");
                format!("internal server error: {m}")
            }
        };
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized(e.to_string()),
            AuthError::TokenError(_) => AppError::Unauthorized("invalid or expired token".into()),
            AuthError::ConfigError(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::NotFound => AppError::NotFound(e.to_string()),
            LifecycleError::AlreadyDeleted | LifecycleError::NotDeleted => {
                AppError::Conflict(e.to_string())
            }
            LifecycleError::Forbidden => AppError::Forbidden(e.to_string()),
            LifecycleError::Store(e) => AppError::from(e),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Io(_) => AppError::Internal(e.to_string()),
            _ => AppError::Validation(e.to_string()),
        }
    }
}

impl From<InvalidInput> for AppError {
    fn from(e: InvalidInput) -> Self {
        AppError::Validation(e.0)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(e: FormRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(e: MultipartRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("invalid multipart body: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn credential_error_is_generic_unauthorized() {
        let e = AppError::from(AuthError::CredentialError);
        assert!(matches!(e, AppError::Unauthorized(ref m) if m == "email or password incorrect"));
    }

    #[test]
    fn store_conflict_is_bad_request() {
        let e = AppError::from(StoreError::Conflict("duplicate".into()));
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let e = AppError::from(StoreError::Timeout(std::time::Duration::from_secs(5)));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        assert_eq!(AppError::from(LifecycleError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(LifecycleError::AlreadyDeleted).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::from(LifecycleError::Forbidden).status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn internal_error_body_embeds_message() {
        let resp = AppError::Internal("connection refused".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "internal server error: connection refused");
        assert!(json.get("data").is_none());
    }
}
