//! File metadata queries.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{order_clause, search_clause, to_i64};
use crate::listing::{ListQuery, Page};
use crate::models::file::FILE_SEARCH_COLUMNS;
use crate::models::{FileRecord, NewFile};
use crate::store::{FileRepository, StoreError};

const COLUMNS: &str = "id, alumni_id, stored_name, original_name, storage_path, size, \
     content_type, category, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<FileRecord>, StoreError> {
        let filter = search_clause("", FILE_SEARCH_COLUMNS);
        let pattern = query.like_pattern();
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM files WHERE {filter}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        let items = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {COLUMNS} FROM files WHERE {filter} {} LIMIT $2 OFFSET $3",
            order_clause("", query)
        ))
        .bind(&pattern)
        .bind(i64::from(query.limit))
        .bind(to_i64(query.offset()))
        .fetch_all(&self.pool)
        .await?;
        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError> {
        let row =
            sqlx::query_as::<_, FileRecord>(&format!("SELECT {COLUMNS} FROM files WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<FileRecord>, StoreError> {
        let rows = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {COLUMNS} FROM files WHERE alumni_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(alumni_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, input: NewFile) -> Result<FileRecord, StoreError> {
        let row = sqlx::query_as::<_, FileRecord>(&format!(
            "INSERT INTO files (id, alumni_id, stored_name, original_name, storage_path, size, \
             content_type, category) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
        ))
        .bind(input.id)
        .bind(input.alumni_id)
        .bind(&input.stored_name)
        .bind(&input.original_name)
        .bind(&input.storage_path)
        .bind(input.size)
        .bind(&input.content_type)
        .bind(input.category)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn stored_names(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>("SELECT stored_name FROM files")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }
}
