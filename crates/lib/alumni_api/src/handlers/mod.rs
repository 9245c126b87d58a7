//! Request handlers.

pub mod alumni;
pub mod auth;
pub mod files;
pub mod jobs;
pub mod roles;

use uuid::Uuid;

use alumni_core::uuid::parse_id;

use crate::error::{AppError, AppResult};

/// Parse a path id, rejecting anything that is not a UUID with a 400.
pub(crate) fn path_id(raw: &str, what: &str) -> AppResult<Uuid> {
    parse_id(raw).ok_or_else(|| AppError::Validation(format!("{what} id is not a valid id")))
}
