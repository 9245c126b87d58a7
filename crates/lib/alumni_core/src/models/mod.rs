//! Domain models shared by the store adapters and the HTTP layer.

pub mod alumni;
pub mod file;
pub mod job;
pub mod role;

pub use alumni::{Alumni, AlumniChanges, CreateAlumniRequest, NewAlumni, UpdateAlumniRequest};
pub use file::{FileCategory, FileRecord, NewFile};
pub use job::{Job, JobChanges, JobRequest, JobState, JobStatus, NewJob};
pub use role::{Role, RoleRequest};

use thiserror::Error;

/// Request payload failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidInput(pub String);

/// Reject empty or whitespace-only required text fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), InvalidInput> {
    if value.trim().is_empty() {
        return Err(InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

/// Treat blank optional text as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
