//! Job record queries. `deleted_at IS NULL` marks an active record.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{order_clause, search_clause, to_i64};
use crate::listing::{ListQuery, Page};
use crate::models::job::JOB_SEARCH_COLUMNS;
use crate::models::{Job, JobChanges, NewJob};
use crate::store::{JobRepository, StoreError};
use crate::uuid::uuidv7;

const COLUMNS: &str = "id, alumni_id, company, position, industry, location, salary_range, \
     start_date, end_date, status, description, deleted_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Job>, StoreError> {
        let filter = format!(
            "deleted_at IS NULL AND {}",
            search_clause("", JOB_SEARCH_COLUMNS)
        );
        let pattern = query.like_pattern();
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM jobs WHERE {filter}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        let items = sqlx::query_as::<_, Job>(&format!(
            "SELECT {COLUMNS} FROM jobs WHERE {filter} {} LIMIT $2 OFFSET $3",
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

    async fn list_trash(&self, owner: Option<Uuid>) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, Job>(&format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE deleted_at IS NOT NULL AND ($1::uuid IS NULL OR alumni_id = $1) \
             ORDER BY deleted_at DESC, id DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, Job>(&format!(
            "SELECT {COLUMNS} FROM jobs WHERE alumni_id = $1 AND deleted_at IS NULL \
             ORDER BY start_date DESC, id DESC"
        ))
        .bind(alumni_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, Job>(&format!("SELECT {COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, input: NewJob) -> Result<Job, StoreError> {
        let row = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (id, alumni_id, company, position, industry, location, \
             salary_range, start_date, end_date, status, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(input.alumni_id)
        .bind(&input.company)
        .bind(&input.position)
        .bind(&input.industry)
        .bind(&input.location)
        .bind(&input.salary_range)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.status)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET alumni_id = $2, company = $3, position = $4, industry = $5, \
             location = $6, salary_range = $7, start_date = $8, end_date = $9, status = $10, \
             description = $11, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.alumni_id)
        .bind(&changes.company)
        .bind(&changes.position)
        .bind(&changes.industry)
        .bind(&changes.location)
        .bind(&changes.salary_range)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.status)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
