//! Job record handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use alumni_core::jobs;
use alumni_core::listing::{ListParams, PageMeta};
use alumni_core::models::job::JOB_SORT_COLUMNS;
use alumni_core::models::{Job, JobRequest};

use super::path_id;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::response::ApiResponse;

async fn ensure_alumni(state: &AppState, alumni_id: Uuid) -> AppResult<()> {
    if state.store.alumni.get(alumni_id).await?.is_none() {
        return Err(AppError::NotFound("alumni not found".into()));
    }
    Ok(())
}

/// `GET /jobs` — active records only.
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Job>>>> {
    let query = params.resolve(JOB_SORT_COLUMNS);
    let page = state.store.jobs.list(&query).await?;
    let meta = PageMeta::new(&query, page.total);
    Ok(ApiResponse::page("job records retrieved", page.items, meta))
}

/// `GET /jobs/trash` — soft-deleted records visible to the caller.
pub async fn trash_jobs_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<Job>>>> {
    let items = jobs::trash(state.store.jobs.as_ref(), &claims).await?;
    Ok(ApiResponse::ok("deleted job records retrieved", items))
}

/// `GET /jobs/{id}`
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Job>>> {
    let id = path_id(&id, "job")?;
    let job = jobs::get_active(state.store.jobs.as_ref(), id).await?;
    Ok(ApiResponse::ok("job record retrieved", job))
}

/// `GET /jobs/alumni/{alumni_id}` — newest start date first.
pub async fn list_alumni_jobs_handler(
    State(state): State<AppState>,
    Path(alumni_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Job>>>> {
    let alumni_id = path_id(&alumni_id, "alumni")?;
    ensure_alumni(&state, alumni_id).await?;
    let items = state.store.jobs.list_by_alumni(alumni_id).await?;
    Ok(ApiResponse::ok("job records retrieved", items))
}

/// `POST /jobs`
pub async fn create_job_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<JobRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Job>>)> {
    let input = body.validate()?;
    ensure_alumni(&state, input.alumni_id).await?;
    let job = state.store.jobs.create(input).await?;
    info!(job_id = %job.id, alumni_id = %job.alumni_id, "job record created");
    Ok((StatusCode::CREATED, ApiResponse::ok("job record created", job)))
}

/// `PUT /jobs/{id}` — active records only.
pub async fn update_job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<JobRequest>, AppError>,
) -> AppResult<Json<ApiResponse<Job>>> {
    let id = path_id(&id, "job")?;
    jobs::get_active(state.store.jobs.as_ref(), id).await?;
    let changes = body.validate()?;
    ensure_alumni(&state, changes.alumni_id).await?;
    let job = state
        .store
        .jobs
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("job record not found".into()))?;
    info!(job_id = %job.id, "job record updated");
    Ok(ApiResponse::ok("job record updated", job))
}

/// `PUT /jobs/{id}/soft-delete`
pub async fn soft_delete_job_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Job>>> {
    let id = path_id(&id, "job")?;
    let job = jobs::soft_delete(state.store.jobs.as_ref(), id, &claims).await?;
    Ok(ApiResponse::ok("job record deleted", job))
}

/// `PUT /jobs/{id}/restore`
pub async fn restore_job_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Job>>> {
    let id = path_id(&id, "job")?;
    let job = jobs::restore(state.store.jobs.as_ref(), id, &claims).await?;
    Ok(ApiResponse::ok("job record restored", job))
}

/// `DELETE /jobs/{id}` — permanent.
pub async fn delete_job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = path_id(&id, "job")?;
    jobs::hard_delete(state.store.jobs.as_ref(), id).await?;
    Ok(ApiResponse::done("job record permanently deleted"))
}
