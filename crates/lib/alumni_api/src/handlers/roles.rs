//! Role handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use tracing::info;

use alumni_core::auth::policy::{ROLE_ADMIN, ROLE_USER};
use alumni_core::listing::{ListParams, PageMeta};
use alumni_core::models::role::ROLE_SORT_COLUMNS;
use alumni_core::models::{Role, RoleRequest};

use super::path_id;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;

fn not_found() -> AppError {
    AppError::NotFound("role not found".into())
}

/// `admin` and `user` back the route policies and the default alumni role.
fn ensure_not_builtin(role: &Role) -> AppResult<()> {
    if [ROLE_ADMIN, ROLE_USER].contains(&role.name.as_str()) {
        return Err(AppError::Validation(format!(
            "built-in role {} cannot be renamed or deleted",
            role.name
        )));
    }
    Ok(())
}

/// `GET /roles`
pub async fn list_roles_handler(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Role>>>> {
    let query = params.resolve(ROLE_SORT_COLUMNS);
    let page = state.store.roles.list(&query).await?;
    let meta = PageMeta::new(&query, page.total);
    Ok(ApiResponse::page("roles retrieved", page.items, meta))
}

/// `GET /roles/{id}`
pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let id = path_id(&id, "role")?;
    let role = state.store.roles.get(id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok("role retrieved", role))
}

/// `POST /roles`
pub async fn create_role_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RoleRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Role>>)> {
    let name = body.validate()?;
    let role = state.store.roles.create(&name).await?;
    info!(role_id = %role.id, name = %role.name, "role created");
    Ok((StatusCode::CREATED, ApiResponse::ok("role created", role)))
}

/// `PUT /roles/{id}` — the built-in roles keep their names.
pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<RoleRequest>, AppError>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let id = path_id(&id, "role")?;
    let name = body.validate()?;
    let current = state.store.roles.get(id).await?.ok_or_else(not_found)?;
    if current.name != name {
        ensure_not_builtin(&current)?;
    }
    let role = state
        .store
        .roles
        .update(id, &name)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::ok("role updated", role))
}

/// `DELETE /roles/{id}` — fails for built-in roles and while any alumni holds the role.
pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = path_id(&id, "role")?;
    let current = state.store.roles.get(id).await?.ok_or_else(not_found)?;
    ensure_not_builtin(&current)?;
    if !state.store.roles.delete(id).await? {
        return Err(not_found());
    }
    info!(role_id = %id, "role deleted");
    Ok(ApiResponse::done("role deleted"))
}
