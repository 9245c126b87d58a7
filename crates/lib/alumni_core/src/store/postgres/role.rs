//! Role queries.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{order_clause, search_clause, to_i64};
use crate::listing::{ListQuery, Page};
use crate::models::Role;
use crate::models::role::ROLE_SEARCH_COLUMNS;
use crate::store::{RoleRepository, StoreError};
use crate::uuid::uuidv7;

const COLUMNS: &str = "id, name, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Role>, StoreError> {
        let filter = search_clause("", ROLE_SEARCH_COLUMNS);
        let pattern = query.like_pattern();
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM roles WHERE {filter}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        let items = sqlx::query_as::<_, Role>(&format!(
            "SELECT {COLUMNS} FROM roles WHERE {filter} {} LIMIT $2 OFFSET $3",
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

    async fn get(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query_as::<_, Role>(&format!("SELECT {COLUMNS} FROM roles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let row =
            sqlx::query_as::<_, Role>(&format!("SELECT {COLUMNS} FROM roles WHERE name = $1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn create(&self, name: &str) -> Result<Role, StoreError> {
        let row = sqlx::query_as::<_, Role>(&format!(
            "INSERT INTO roles (id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, name: &str) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query_as::<_, Role>(&format!(
            "UPDATE roles SET name = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
