// Record identifiers are UUIDv7 generated app-side, so every storage
// adapter hands out the same time-sortable ids and `ORDER BY id` follows
// insertion order on PostgreSQL, MongoDB and the in-memory store alike.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a textual record id, rejecting anything that is not a UUID.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
