//! Role names and the policies that gate routes on them.

/// Administrator role name.
pub const ROLE_ADMIN: &str = "admin";

/// Regular alumni role name.
pub const ROLE_USER: &str = "user";

/// Which roles a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePolicy {
    AdminOnly,
    UserOrAdmin,
}

impl RolePolicy {
    /// Whether a caller with `role` passes this policy. Role names are exact.
    pub fn allows(self, role: &str) -> bool {
        match self {
            Self::AdminOnly => role == ROLE_ADMIN,
            Self::UserOrAdmin => role == ROLE_ADMIN || role == ROLE_USER,
        }
    }
}

/// Whether a caller may act on a record owned by `owner`.
/// Administrators may act on anything.
pub fn owns_or_admin(caller: uuid::Uuid, role: &str, owner: uuid::Uuid) -> bool {
    role == ROLE_ADMIN || caller == owner
}
