//! File handlers: metadata reads, uploads and deletion.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;

use alumni_core::listing::{ListParams, PageMeta};
use alumni_core::models::file::FILE_SORT_COLUMNS;
use alumni_core::models::{FileCategory, FileRecord};

use super::path_id;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthenticatedUser, ensure_owner_or_admin};
use crate::response::ApiResponse;
use crate::services::uploads::{self, UploadForm};

/// Collect the `alumni_id` and `file` fields of an upload.
async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("alumni_id") => form.alumni_id = Some(field.text().await?),
            Some("file") => {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                form.bytes = Some(field.bytes().await?.to_vec());
            }
            _ => {}
        }
    }
    Ok(form)
}

/// `GET /files`
pub async fn list_files_handler(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<FileRecord>>>> {
    let query = params.resolve(FILE_SORT_COLUMNS);
    let page = state.store.files.list(&query).await?;
    let meta = PageMeta::new(&query, page.total);
    Ok(ApiResponse::page("files retrieved", page.items, meta))
}

/// `GET /files/{id}`
pub async fn get_file_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<FileRecord>>> {
    let id = path_id(&id, "file")?;
    let file = state
        .store
        .files
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("file not found".into()))?;
    Ok(ApiResponse::ok("file retrieved", file))
}

/// `GET /files/alumni/{alumni_id}` — owner or admin.
pub async fn list_alumni_files_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Path(alumni_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<FileRecord>>>> {
    let alumni_id = path_id(&alumni_id, "alumni")?;
    ensure_owner_or_admin(&claims, alumni_id)?;
    let files = state.store.files.list_by_alumni(alumni_id).await?;
    Ok(ApiResponse::ok("files retrieved", files))
}

async fn upload(
    state: AppState,
    claims: AuthenticatedUser,
    category: FileCategory,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<FileRecord>>)> {
    let form = read_form(multipart).await?;
    let record = uploads::upload(&state.store, &state.storage, &claims.0, category, form).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("file uploaded", record)))
}

/// `POST /files/upload/foto` — JPEG or PNG up to 1 MiB.
pub async fn upload_photo_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<FileRecord>>)> {
    upload(state, user, FileCategory::Photo, multipart).await
}

/// `POST /files/upload/sertifikat` — PDF up to 2 MiB.
pub async fn upload_certificate_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<FileRecord>>)> {
    upload(state, user, FileCategory::Certificate, multipart).await
}

/// `DELETE /files/{id}`
pub async fn delete_file_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = path_id(&id, "file")?;
    uploads::delete(&state.store, &state.storage, id).await?;
    Ok(ApiResponse::done("file deleted"))
}
