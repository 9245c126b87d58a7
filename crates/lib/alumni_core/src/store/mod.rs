//! Record Store: one repository trait per entity with swappable adapters.
//!
//! | Adapter    | Backing                               |
//! |------------|---------------------------------------|
//! | `postgres` | PostgreSQL via `sqlx`                 |
//! | `mongo`    | MongoDB, every call bounded by 5 s    |
//! | `memory`   | `tokio::sync::RwLock` maps            |

pub mod memory;
pub mod mongo;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::listing::{ListQuery, Page};
use crate::models::{
    Alumni, AlumniChanges, FileRecord, Job, JobChanges, NewAlumni, NewFile, NewJob, Role,
};

/// Errors raised by the store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique or reference constraint violated.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("datastore call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return Self::Conflict(format!(
                        "duplicate value violates {}",
                        db.constraint().unwrap_or("a unique constraint")
                    ));
                }
                // foreign_key_violation
                Some("23503") => {
                    return Self::Conflict(format!(
                        "record is still referenced or references a missing record ({})",
                        db.constraint().unwrap_or("foreign key")
                    ));
                }
                _ => {}
            }
        }
        Self::Database(e.to_string())
    }
}

const DUPLICATE_KEY: i32 = 11000;

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};
        // 11000 is DuplicateKey; find-and-modify reports it as a command error
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == DUPLICATE_KEY => {
                Self::Conflict(format!("duplicate value: {}", w.message))
            }
            ErrorKind::Command(c) if c.code == DUPLICATE_KEY => {
                Self::Conflict(format!("duplicate value: {}", c.message))
            }
            _ => Self::Database(e.to_string()),
        }
    }
}

// =============================================================================
// Repository traits
// =============================================================================

#[async_trait]
pub trait AlumniRepository: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<Alumni>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Alumni>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Alumni>, StoreError>;
    async fn find_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<Alumni>, StoreError>;
    async fn create(&self, input: NewAlumni) -> Result<Alumni, StoreError>;
    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
    ) -> Result<Option<Alumni>, StoreError>;
    /// Returns `false` when no record had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<Role>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Role>, StoreError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;
    async fn create(&self, name: &str) -> Result<Role, StoreError>;
    async fn update(&self, id: Uuid, name: &str) -> Result<Option<Role>, StoreError>;
    /// Fails with [`StoreError::Conflict`] while any alumni holds the role.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Job records. Listings and updates see active records only; `get` returns
/// soft-deleted records too so callers can tell the states apart.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<Job>, StoreError>;
    /// Soft-deleted records, newest deletion first, optionally for one owner.
    async fn list_trash(&self, owner: Option<Uuid>) -> Result<Vec<Job>, StoreError>;
    /// Active records of one alumni, newest start date first.
    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<Job>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    async fn create(&self, input: NewJob) -> Result<Job, StoreError>;
    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Option<Job>, StoreError>;
    /// Marks an active record deleted. `None` if no active record matched.
    async fn soft_delete(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    /// Clears the deletion marker. `None` if no soft-deleted record matched.
    async fn restore(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<FileRecord>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError>;
    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<FileRecord>, StoreError>;
    async fn create(&self, input: NewFile) -> Result<FileRecord, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Every stored file name that a record references.
    async fn stored_names(&self) -> Result<Vec<String>, StoreError>;
}

// =============================================================================
// Store bundle
// =============================================================================

/// The four repositories behind one backing store.
#[derive(Clone)]
pub struct Store {
    pub alumni: Arc<dyn AlumniRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub files: Arc<dyn FileRepository>,
}

impl Store {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            alumni: Arc::new(postgres::PgAlumniRepository::new(pool.clone())),
            roles: Arc::new(postgres::PgRoleRepository::new(pool.clone())),
            jobs: Arc::new(postgres::PgJobRepository::new(pool.clone())),
            files: Arc::new(postgres::PgFileRepository::new(pool)),
        }
    }

    pub fn mongo(db: mongodb::Database) -> Self {
        Self {
            alumni: Arc::new(mongo::MongoAlumniRepository::new(&db)),
            roles: Arc::new(mongo::MongoRoleRepository::new(&db)),
            jobs: Arc::new(mongo::MongoJobRepository::new(&db)),
            files: Arc::new(mongo::MongoFileRepository::new(&db)),
        }
    }

    pub fn memory() -> Self {
        let db = memory::MemoryDb::new();
        Self {
            alumni: Arc::new(memory::MemoryAlumniRepository::new(db.clone())),
            roles: Arc::new(memory::MemoryRoleRepository::new(db.clone())),
            jobs: Arc::new(memory::MemoryJobRepository::new(db.clone())),
            files: Arc::new(memory::MemoryFileRepository::new(db)),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
