//! Role entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InvalidInput, require};

/// Sortable columns for role listings.
pub const ROLE_SORT_COLUMNS: &[&str] = &["id", "name", "created_at"];

/// Columns searched by the `search` query parameter.
pub const ROLE_SEARCH_COLUMNS: &[&str] = &["name"];

/// An authorization label (`admin`, `user`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /roles` and `PUT /roles/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub name: String,
}

impl RoleRequest {
    /// Validate and return the trimmed role name.
    pub fn validate(self) -> Result<String, InvalidInput> {
        require("name", &self.name)?;
        Ok(self.name.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let req = RoleRequest { name: "   ".into() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn name_is_trimmed() {
        let req = RoleRequest {
            name: " editor ".into(),
        };
        assert_eq!(req.validate().unwrap(), "editor");
    }
}
