//! Alumni handlers.

use std::path::Path as FsPath;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use alumni_core::auth::password::hash_password;
use alumni_core::auth::policy::ROLE_USER;
use alumni_core::listing::{ListParams, PageMeta};
use alumni_core::models::alumni::ALUMNI_SORT_COLUMNS;
use alumni_core::models::{Alumni, CreateAlumniRequest, UpdateAlumniRequest};

use super::path_id;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;

fn not_found() -> AppError {
    AppError::NotFound("alumni not found".into())
}

async fn ensure_role(state: &AppState, role_id: Uuid) -> AppResult<()> {
    if state.store.roles.get(role_id).await?.is_none() {
        return Err(AppError::Validation("role_id does not reference a role".into()));
    }
    Ok(())
}

/// `GET /alumni`
pub async fn list_alumni_handler(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Alumni>>>> {
    let query = params.resolve(ALUMNI_SORT_COLUMNS);
    let page = state.store.alumni.list(&query).await?;
    let meta = PageMeta::new(&query, page.total);
    Ok(ApiResponse::page("alumni retrieved", page.items, meta))
}

/// `GET /alumni/{id}`
pub async fn get_alumni_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Alumni>>> {
    let id = path_id(&id, "alumni")?;
    let alumni = state.store.alumni.get(id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok("alumni retrieved", alumni))
}

/// `POST /alumni` — the password is hashed; the role defaults to `user`.
pub async fn create_alumni_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreateAlumniRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Alumni>>)> {
    let body = body.validate()?;
    let role_id = match body.role_id {
        Some(id) => {
            ensure_role(&state, id).await?;
            id
        }
        None => {
            state
                .store
                .roles
                .find_by_name(ROLE_USER)
                .await?
                .ok_or_else(|| AppError::Internal("built-in user role is missing".into()))?
                .id
        }
    };
    let password_hash = hash_password(&body.password)?;
    let alumni = state
        .store
        .alumni
        .create(body.into_new(password_hash, role_id))
        .await?;
    info!(alumni_id = %alumni.id, role = %alumni.role, "alumni created");
    Ok((StatusCode::CREATED, ApiResponse::ok("alumni created", alumni)))
}

/// `PUT /alumni/{id}` — profile fields and role; the password is unchanged.
pub async fn update_alumni_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateAlumniRequest>, AppError>,
) -> AppResult<Json<ApiResponse<Alumni>>> {
    let id = path_id(&id, "alumni")?;
    let current = state.store.alumni.get(id).await?.ok_or_else(not_found)?;
    let changes = body.validate(current.role_id)?;
    if changes.role_id != current.role_id {
        ensure_role(&state, changes.role_id).await?;
    }
    let alumni = state
        .store
        .alumni
        .update(id, changes)
        .await?
        .ok_or_else(not_found)?;
    info!(alumni_id = %alumni.id, "alumni updated");
    Ok(ApiResponse::ok("alumni updated", alumni))
}

/// `DELETE /alumni/{id}` — job and file records go with it.
pub async fn delete_alumni_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = path_id(&id, "alumni")?;
    let files = state.store.files.list_by_alumni(id).await?;
    if !state.store.alumni.delete(id).await? {
        return Err(not_found());
    }
    for file in &files {
        state
            .storage
            .remove_best_effort(FsPath::new(&file.storage_path))
            .await;
    }
    info!(alumni_id = %id, files = files.len(), "alumni deleted");
    Ok(ApiResponse::done("alumni deleted"))
}
