//! File metadata collection.

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    ALUMNI, FILES, bounded, parse_timestamp, parse_uuid, search_filter, sort_doc, timestamp,
};
use crate::listing::{ListQuery, Page};
use crate::models::file::FILE_SEARCH_COLUMNS;
use crate::models::{FileCategory, FileRecord, NewFile};
use crate::store::{FileRepository, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileDoc {
    #[serde(rename = "_id")]
    id: String,
    alumni_id: String,
    stored_name: String,
    original_name: String,
    storage_path: String,
    size: i64,
    content_type: String,
    category: FileCategory,
    created_at: String,
    updated_at: String,
}

impl TryFrom<FileDoc> for FileRecord {
    type Error = StoreError;

    fn try_from(d: FileDoc) -> Result<Self, Self::Error> {
        Ok(FileRecord {
            id: parse_uuid(&d.id)?,
            alumni_id: parse_uuid(&d.alumni_id)?,
            stored_name: d.stored_name,
            original_name: d.original_name,
            storage_path: d.storage_path,
            size: d.size,
            content_type: d.content_type,
            category: d.category,
            created_at: parse_timestamp(&d.created_at)?,
            updated_at: parse_timestamp(&d.updated_at)?,
        })
    }
}

fn collect(docs: Vec<FileDoc>) -> Result<Vec<FileRecord>, StoreError> {
    docs.into_iter().map(FileRecord::try_from).collect()
}

#[derive(Debug, Clone)]
pub struct MongoFileRepository {
    files: Collection<FileDoc>,
    alumni: Collection<Document>,
}

impl MongoFileRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            files: db.collection(FILES),
            alumni: db.collection(ALUMNI),
        }
    }
}

#[async_trait]
impl FileRepository for MongoFileRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<FileRecord>, StoreError> {
        let filter = search_filter(query, FILE_SEARCH_COLUMNS);
        let total = bounded(self.files.count_documents(filter.clone())).await?;
        let docs: Vec<FileDoc> = bounded(async {
            self.files
                .find(filter)
                .sort(sort_doc(query))
                .skip(query.offset())
                .limit(i64::from(query.limit))
                .await?
                .try_collect::<Vec<_>>()
                .await
        })
        .await?;
        Ok(Page {
            items: collect(docs)?,
            total,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError> {
        bounded(self.files.find_one(doc! { "_id": id.to_string() }))
            .await?
            .map(FileRecord::try_from)
            .transpose()
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<FileRecord>, StoreError> {
        let docs: Vec<FileDoc> = bounded(async {
            self.files
                .find(doc! { "alumni_id": alumni_id.to_string() })
                .sort(doc! { "created_at": -1, "_id": -1 })
                .await?
                .try_collect::<Vec<_>>()
                .await
        })
        .await?;
        collect(docs)
    }

    async fn create(&self, input: NewFile) -> Result<FileRecord, StoreError> {
        let owners = bounded(
            self.alumni
                .count_documents(doc! { "_id": input.alumni_id.to_string() }),
        )
        .await?;
        if owners == 0 {
            return Err(StoreError::Conflict("alumni does not exist".into()));
        }
        let now = timestamp(Utc::now());
        let d = FileDoc {
            id: input.id.to_string(),
            alumni_id: input.alumni_id.to_string(),
            stored_name: input.stored_name,
            original_name: input.original_name,
            storage_path: input.storage_path,
            size: input.size,
            content_type: input.content_type,
            category: input.category,
            created_at: now.clone(),
            updated_at: now,
        };
        bounded(self.files.insert_one(&d)).await?;
        FileRecord::try_from(d)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = bounded(self.files.delete_one(doc! { "_id": id.to_string() })).await?;
        Ok(result.deleted_count > 0)
    }

    async fn stored_names(&self) -> Result<Vec<String>, StoreError> {
        let docs: Vec<Document> = bounded(async {
            self.files
                .clone_with_type::<Document>()
                .find(doc! {})
                .with_options(
                    FindOptions::builder()
                        .projection(doc! { "stored_name": 1, "_id": 0 })
                        .build(),
                )
                .await?
                .try_collect::<Vec<_>>()
                .await
        })
        .await?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_str("stored_name").ok().map(str::to_string))
            .collect())
    }
}
