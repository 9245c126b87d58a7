//! Authentication request handlers.

use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Extension, Form, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use alumni_core::models::Alumni;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::response::ApiResponse;
use crate::services::auth::{self, LoginResponse, ProfileResponse};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckAlumniRequest {
    #[serde(default)]
    pub student_number: String,
}

#[derive(Debug, Serialize)]
pub struct CheckAlumniResponse {
    pub success: bool,
    pub message: String,
    pub is_alumni: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Alumni>,
}

/// `POST /login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth::login(&state.store, &state.tokens, &body.email, &body.password).await?;
    Ok(ApiResponse::ok("login successful", resp))
}

/// `GET /profile` — the authenticated caller.
pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let resp = auth::profile(&state.store, &claims).await?;
    Ok(ApiResponse::ok("profile retrieved", resp))
}

/// `POST /alumni/check/{key}` — is this student number a registered alumni?
///
/// Authenticated by the API key in the path; accepts a form or JSON body.
pub async fn check_alumni_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    request: Request,
) -> AppResult<Json<CheckAlumniResponse>> {
    auth::check_api_key(state.config.api_key.as_deref(), &key)?;

    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));
    let body = if is_json {
        Json::<CheckAlumniRequest>::from_request(request, &()).await?.0
    } else {
        Form::<CheckAlumniRequest>::from_request(request, &()).await?.0
    };

    let student_number = body.student_number.trim();
    if student_number.is_empty() {
        return Err(AppError::Validation("student_number is required".into()));
    }

    let found = state
        .store
        .alumni
        .find_by_student_number(student_number)
        .await?;
    debug!(student_number, found = found.is_some(), "alumni check");
    let resp = match found {
        Some(alumni) => CheckAlumniResponse {
            success: true,
            message: "student number belongs to a registered alumni".into(),
            is_alumni: true,
            data: Some(alumni),
        },
        None => CheckAlumniResponse {
            success: true,
            message: "student number is not registered as alumni".into(),
            is_alumni: false,
            data: None,
        },
    };
    Ok(Json(resp))
}
