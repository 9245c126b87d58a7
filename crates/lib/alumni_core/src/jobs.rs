//! Job record lifecycle: active, soft-deleted, and hard-deleted (gone).
//!
//! Checks run in a fixed order: existence (not found), state (already
//! deleted / not deleted), then ownership. Administrators may act on any
//! record; other callers only on records they own.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::auth::jwt::TokenClaims;
use crate::auth::policy::{ROLE_ADMIN, owns_or_admin};
use crate::models::{Job, JobState};
use crate::store::{JobRepository, StoreError};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("job record not found")]
    NotFound,

    #[error("job record is already deleted")]
    AlreadyDeleted,

    #[error("job record is not deleted")]
    NotDeleted,

    #[error("you may only modify your own job records")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// active -> soft-deleted. Not idempotent: a second call fails.
pub async fn soft_delete(
    jobs: &dyn JobRepository,
    id: Uuid,
    caller: &TokenClaims,
) -> Result<Job, LifecycleError> {
    let job = jobs.get(id).await?.ok_or(LifecycleError::NotFound)?;
    if job.state() == JobState::SoftDeleted {
        return Err(LifecycleError::AlreadyDeleted);
    }
    if !owns_or_admin(caller.sub, &caller.role, job.alumni_id) {
        return Err(LifecycleError::Forbidden);
    }
    // A concurrent soft delete may win between the read and the write.
    let job = jobs
        .soft_delete(id)
        .await?
        .ok_or(LifecycleError::AlreadyDeleted)?;
    info!(job_id = %id, by = %caller.sub, "job record soft-deleted");
    Ok(job)
}

/// soft-deleted -> active.
pub async fn restore(
    jobs: &dyn JobRepository,
    id: Uuid,
    caller: &TokenClaims,
) -> Result<Job, LifecycleError> {
    let job = jobs.get(id).await?.ok_or(LifecycleError::NotFound)?;
    if job.state() == JobState::Active {
        return Err(LifecycleError::NotDeleted);
    }
    if !owns_or_admin(caller.sub, &caller.role, job.alumni_id) {
        return Err(LifecycleError::Forbidden);
    }
    let job = jobs.restore(id).await?.ok_or(LifecycleError::NotDeleted)?;
    info!(job_id = %id, by = %caller.sub, "job record restored");
    Ok(job)
}

/// {active, soft-deleted} -> gone. Role gating happens at the route.
pub async fn hard_delete(jobs: &dyn JobRepository, id: Uuid) -> Result<(), LifecycleError> {
    if !jobs.delete(id).await? {
        return Err(LifecycleError::NotFound);
    }
    info!(job_id = %id, "job record permanently deleted");
    Ok(())
}

/// Soft-deleted records visible to the caller: all for an administrator,
/// otherwise only the caller's own.
pub async fn trash(
    jobs: &dyn JobRepository,
    caller: &TokenClaims,
) -> Result<Vec<Job>, LifecycleError> {
    let owner = (caller.role != ROLE_ADMIN).then_some(caller.sub);
    Ok(jobs.list_trash(owner).await?)
}

/// An active record by id; soft-deleted records read as not found.
pub async fn get_active(jobs: &dyn JobRepository, id: Uuid) -> Result<Job, LifecycleError> {
    jobs.get(id)
        .await?
        .filter(|j| j.state() == JobState::Active)
        .ok_or(LifecycleError::NotFound)
}
