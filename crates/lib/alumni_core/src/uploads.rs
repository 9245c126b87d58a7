//! Upload rules per category and the on-disk file store.
//!
//! Files live at `<root>/<category>/<uuid><ext>`. Writing the file and
//! writing its metadata are separate steps; [`FileStorage::sweep_orphans`]
//! reconciles files that lost their metadata record.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::FileCategory;
use crate::uuid::uuidv7;

/// Size and type limits for one upload category.
#[derive(Debug)]
pub struct UploadRule {
    pub max_bytes: usize,
    /// Accepted content types and the extension stored for each.
    pub content_types: &'static [(&'static str, &'static str)],
}

static PHOTO_RULE: UploadRule = UploadRule {
    max_bytes: 1024 * 1024,
    content_types: &[
        ("image/jpeg", ".jpg"),
        ("image/jpg", ".jpg"),
        ("image/png", ".png"),
    ],
};

static CERTIFICATE_RULE: UploadRule = UploadRule {
    max_bytes: 2 * 1024 * 1024,
    content_types: &[("application/pdf", ".pdf")],
};

pub fn rule_for(category: FileCategory) -> &'static UploadRule {
    match category {
        FileCategory::Photo => &PHOTO_RULE,
        FileCategory::Certificate => &CERTIFICATE_RULE,
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file is required")]
    MissingFile,

    #[error("file size {size} bytes exceeds the {limit} byte limit for {category}")]
    TooLarge {
        category: FileCategory,
        size: usize,
        limit: usize,
    },

    #[error("content type {content_type:?} is not allowed for {category} (allowed: {allowed})")]
    UnsupportedType {
        category: FileCategory,
        content_type: String,
        allowed: String,
    },

    #[error("file storage error: {0}")]
    Io(#[from] io::Error),
}

/// Lower-cased media type without parameters (`image/PNG; q=1` -> `image/png`).
fn normalise_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// Check a candidate upload against its category's limits, returning the
/// normalised content type and the extension to store it under.
pub fn check_upload(
    category: FileCategory,
    content_type: &str,
    size: usize,
) -> Result<(String, &'static str), UploadError> {
    let rule = rule_for(category);
    if size == 0 {
        return Err(UploadError::MissingFile);
    }
    if size > rule.max_bytes {
        return Err(UploadError::TooLarge {
            category,
            size,
            limit: rule.max_bytes,
        });
    }
    let content_type = normalise_content_type(content_type);
    match rule
        .content_types
        .iter()
        .find(|(ct, _)| *ct == content_type)
    {
        Some((_, ext)) => Ok((content_type, *ext)),
        None => Err(UploadError::UnsupportedType {
            category,
            content_type,
            allowed: rule
                .content_types
                .iter()
                .map(|(ct, _)| *ct)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// A file written to disk, not yet backed by a metadata record.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub id: Uuid,
    pub stored_name: String,
    pub path: PathBuf,
}

/// Upload directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn category_dir(&self, category: FileCategory) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Create the per-category directories.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        for category in FileCategory::all() {
            tokio::fs::create_dir_all(self.category_dir(category)).await?;
        }
        Ok(())
    }

    /// Write `bytes` under a fresh UUID name.
    pub async fn write(
        &self,
        category: FileCategory,
        ext: &str,
        bytes: &[u8],
    ) -> io::Result<StoredObject> {
        let dir = self.category_dir(category);
        tokio::fs::create_dir_all(&dir).await?;
        let id = uuidv7();
        let stored_name = format!("{id}{ext}");
        let path = dir.join(&stored_name);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(StoredObject {
            id,
            stored_name,
            path,
        })
    }

    /// Remove a stored file, logging instead of failing.
    pub async fn remove_best_effort(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "removed stored file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove stored file"),
        }
    }

    /// Delete files under the category directories whose names are not in
    /// `referenced`. Returns the number of files removed.
    pub async fn sweep_orphans(&self, referenced: &HashSet<String>) -> io::Result<usize> {
        let mut removed = 0;
        for category in FileCategory::all() {
            let dir = self.category_dir(category);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if referenced.contains(&name) {
                    continue;
                }
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => {
                        removed += 1;
                        info!(path = %entry.path().display(), "removed orphaned upload");
                    }
                    Err(e) => {
                        warn!(path = %entry.path().display(), error = %e, "failed to remove orphaned upload")
                    }
                }
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_accepts_jpeg_and_png() {
        let (ct, ext) = check_upload(FileCategory::Photo, "image/jpeg", 10).unwrap();
        assert_eq!((ct.as_str(), ext), ("image/jpeg", ".jpg"));
        let (_, ext) = check_upload(FileCategory::Photo, "image/jpg", 10).unwrap();
        assert_eq!(ext, ".jpg");
        let (_, ext) = check_upload(FileCategory::Photo, "IMAGE/PNG; charset=binary", 10).unwrap();
        assert_eq!(ext, ".png");
    }

    #[test]
    fn photo_rejects_pdf() {
        let err = check_upload(FileCategory::Photo, "application/pdf", 10).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[test]
    fn certificate_accepts_only_pdf() {
        assert!(check_upload(FileCategory::Certificate, "application/pdf", 10).is_ok());
        assert!(check_upload(FileCategory::Certificate, "image/png", 10).is_err());
    }

    #[test]
    fn size_limits_are_inclusive() {
        assert!(check_upload(FileCategory::Photo, "image/png", 1024 * 1024).is_ok());
        assert!(matches!(
            check_upload(FileCategory::Photo, "image/png", 1024 * 1024 + 1),
            Err(UploadError::TooLarge { .. })
        ));
        assert!(check_upload(FileCategory::Certificate, "application/pdf", 2 * 1024 * 1024).is_ok());
        assert!(matches!(
            check_upload(FileCategory::Certificate, "application/pdf", 3 * 1024 * 1024),
            Err(UploadError::TooLarge { limit, .. }) if limit == 2 * 1024 * 1024
        ));
    }

    #[test]
    fn empty_file_is_missing() {
        assert!(matches!(
            check_upload(FileCategory::Photo, "image/png", 0),
            Err(UploadError::MissingFile)
        ));
    }

    #[tokio::test]
    async fn write_places_file_under_category() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let obj = storage
            .write(FileCategory::Certificate, ".pdf", b"%PDF-1.4")
            .await
            .unwrap();
        assert!(obj.stored_name.ends_with(".pdf"));
        assert_eq!(obj.path, dir.path().join("sertifikat").join(&obj.stored_name));
        assert_eq!(tokio::fs::read(&obj.path).await.unwrap(), b"%PDF-1.4");

        storage.remove_best_effort(&obj.path).await;
        assert!(!obj.path.exists());
        // A second removal is silent.
        storage.remove_best_effort(&obj.path).await;
    }

    #[tokio::test]
    async fn sweep_removes_only_unreferenced_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.ensure_dirs().await.unwrap();
        let kept = storage
            .write(FileCategory::Photo, ".png", b"png")
            .await
            .unwrap();
        let orphan = storage
            .write(FileCategory::Certificate, ".pdf", b"pdf")
            .await
            .unwrap();

        let referenced: HashSet<String> = [kept.stored_name.clone()].into();
        let removed = storage.sweep_orphans(&referenced).await.unwrap();
        assert_eq!(removed, 1);
        assert!(kept.path.exists());
        assert!(!orphan.path.exists());
    }

    #[tokio::test]
    async fn sweep_tolerates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("never-created"));
        assert_eq!(storage.sweep_orphans(&HashSet::new()).await.unwrap(), 0);
    }
}
