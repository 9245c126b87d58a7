//! Uploaded file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sortable columns for file listings.
pub const FILE_SORT_COLUMNS: &[&str] = &[
    "id",
    "alumni_id",
    "original_name",
    "size",
    "category",
    "created_at",
];

/// Columns searched by the `search` query parameter.
pub const FILE_SEARCH_COLUMNS: &[&str] = &["original_name", "content_type", "category"];

/// Upload category. Each category has its own size and type limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_category")]
pub enum FileCategory {
    #[sqlx(rename = "foto")]
    #[serde(rename = "foto")]
    Photo,
    #[sqlx(rename = "sertifikat")]
    #[serde(rename = "sertifikat")]
    Certificate,
}

impl FileCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "foto",
            Self::Certificate => "sertifikat",
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Photo, Self::Certificate]
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored file's metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub size: i64,
    pub content_type: String,
    pub category: FileCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store input for a new file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub size: i64,
    pub content_type: String,
    pub category: FileCategory,
}
