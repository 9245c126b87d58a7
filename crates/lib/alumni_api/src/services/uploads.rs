//! Upload flow: validate, write the file, then record its metadata.

use std::collections::HashSet;

use tracing::{info, warn};
use uuid::Uuid;

use alumni_core::auth::jwt::TokenClaims;
use alumni_core::models::{FileCategory, FileRecord, NewFile};
use alumni_core::store::Store;
use alumni_core::uploads::{FileStorage, check_upload};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ensure_owner_or_admin;

/// A parsed multipart upload, before any validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub alumni_id: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Option<Vec<u8>>,
}

/// Store an upload for `category`.
///
/// Ownership, size and type are all checked before anything touches the
/// disk. If the metadata write fails, the just-written file is removed.
pub async fn upload(
    store: &Store,
    storage: &FileStorage,
    caller: &TokenClaims,
    category: FileCategory,
    form: UploadForm,
) -> AppResult<FileRecord> {
    let raw_id = form
        .alumni_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("alumni_id is required".into()))?;
    let alumni_id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::Validation("alumni_id is not a valid id".into()))?;
    ensure_owner_or_admin(caller, alumni_id)?;

    let bytes = form
        .bytes
        .ok_or_else(|| AppError::Validation("file is required".into()))?;
    let (content_type, ext) = check_upload(
        category,
        form.content_type.as_deref().unwrap_or_default(),
        bytes.len(),
    )?;

    if store.alumni.get(alumni_id).await?.is_none() {
        return Err(AppError::NotFound("alumni not found".into()));
    }

    let object = storage.write(category, ext, &bytes).await.map_err(|e| {
        AppError::Internal(format!("failed to store upload: {e}"))
    })?;
    let original_name = form
        .file_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| object.stored_name.clone());

    let created = store
        .files
        .create(NewFile {
            id: object.id,
            alumni_id,
            stored_name: object.stored_name.clone(),
            original_name,
            storage_path: object.path.to_string_lossy().into_owned(),
            size: i64::try_from(bytes.len()).unwrap_or(i64::MAX),
            content_type,
            category,
        })
        .await;

    match created {
        Ok(record) => {
            info!(file_id = %record.id, alumni_id = %alumni_id, %category, size = record.size, "file uploaded");
            Ok(record)
        }
        Err(e) => {
            warn!(path = %object.path.display(), error = %e, "metadata write failed, removing stored file");
            storage.remove_best_effort(&object.path).await;
            Err(e.into())
        }
    }
}

/// Delete a file record and, best-effort, the stored file.
pub async fn delete(store: &Store, storage: &FileStorage, id: Uuid) -> AppResult<()> {
    let record = store
        .files
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("file not found".into()))?;
    if !store.files.delete(id).await? {
        return Err(AppError::NotFound("file not found".into()));
    }
    storage
        .remove_best_effort(std::path::Path::new(&record.storage_path))
        .await;
    info!(file_id = %id, "file deleted");
    Ok(())
}

/// Remove stored files that no metadata record references.
pub async fn sweep_orphans(store: &Store, storage: &FileStorage) -> AppResult<usize> {
    let referenced: HashSet<String> = store.files.stored_names().await?.into_iter().collect();
    let removed = storage
        .sweep_orphans(&referenced)
        .await
        .map_err(|e| AppError::Internal(format!("orphan sweep failed: {e}")))?;
    info!(removed, root = %storage.root().display(), "orphan sweep finished");
    Ok(removed)
}
