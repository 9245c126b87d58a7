//! Alumni queries. The role name is joined in from `roles` on every read.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{order_clause, search_clause, to_i64};
use crate::listing::{ListQuery, Page};
use crate::models::alumni::ALUMNI_SEARCH_COLUMNS;
use crate::models::{Alumni, AlumniChanges, NewAlumni};
use crate::store::{AlumniRepository, StoreError};
use crate::uuid::uuidv7;

const SELECT: &str = "SELECT a.id, a.student_number, a.name, a.major, a.entry_year, \
     a.graduation_year, a.email, a.password_hash, a.phone, a.address, a.role_id, \
     r.name AS role, a.created_at, a.updated_at \
     FROM alumni a JOIN roles r ON r.id = a.role_id";

#[derive(Debug, Clone)]
pub struct PgAlumniRepository {
    pool: PgPool,
}

impl PgAlumniRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Alumni>, StoreError> {
        let row = sqlx::query_as::<_, Alumni>(&format!("{SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl AlumniRepository for PgAlumniRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Alumni>, StoreError> {
        let filter = search_clause("a.", ALUMNI_SEARCH_COLUMNS);
        let pattern = query.like_pattern();
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM alumni a WHERE {filter}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        let items = sqlx::query_as::<_, Alumni>(&format!(
            "{SELECT} WHERE {filter} {} LIMIT $2 OFFSET $3",
            order_clause("a.", query)
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

    async fn get(&self, id: Uuid) -> Result<Option<Alumni>, StoreError> {
        self.fetch(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Alumni>, StoreError> {
        let row = sqlx::query_as::<_, Alumni>(&format!("{SELECT} WHERE lower(a.email) = lower($1)"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<Alumni>, StoreError> {
        let row = sqlx::query_as::<_, Alumni>(&format!("{SELECT} WHERE a.student_number = $1"))
            .bind(student_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, input: NewAlumni) -> Result<Alumni, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO alumni (id, student_number, name, major, entry_year, graduation_year, \
             email, password_hash, phone, address, role_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING id",
        )
        .bind(uuidv7())
        .bind(&input.student_number)
        .bind(&input.name)
        .bind(&input.major)
        .bind(input.entry_year)
        .bind(input.graduation_year)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.role_id)
        .fetch_one(&self.pool)
        .await?;
        self.fetch(id)
            .await?
            .ok_or_else(|| StoreError::Database(format!("alumni {id} vanished after insert")))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
    ) -> Result<Option<Alumni>, StoreError> {
        let updated = sqlx::query(
            "UPDATE alumni SET student_number = $2, name = $3, major = $4, entry_year = $5, \
             graduation_year = $6, email = $7, phone = $8, address = $9, role_id = $10, \
             updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.student_number)
        .bind(&changes.name)
        .bind(&changes.major)
        .bind(changes.entry_year)
        .bind(changes.graduation_year)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.address)
        .bind(changes.role_id)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alumni")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }
}
