//! PostgreSQL adapter.
//!
//! Sort columns are interpolated into SQL only after whitelist resolution in
//! [`ListParams::resolve`](crate::listing::ListParams::resolve); every value
//! is bound as a parameter.

mod alumni;
mod file;
mod job;
mod role;

pub use alumni::PgAlumniRepository;
pub use file::PgFileRepository;
pub use job::PgJobRepository;
pub use role::PgRoleRepository;

use crate::listing::ListQuery;

/// `ORDER BY` clause for a resolved query, with `id` as the tiebreaker.
fn order_clause(prefix: &str, query: &ListQuery) -> String {
    let dir = query.order.as_sql();
    if query.sort_by == "id" {
        format!("ORDER BY {prefix}id {dir}")
    } else {
        format!("ORDER BY {prefix}{} {dir}, {prefix}id {dir}", query.sort_by)
    }
}

/// `($1::text IS NULL OR col ILIKE $1 OR ...)` over the searchable columns.
fn search_clause(prefix: &str, columns: &[&str]) -> String {
    let ors: Vec<String> = columns
        .iter()
        .map(|c| format!("{prefix}{c}::text ILIKE $1"))
        .collect();
    format!("($1::text IS NULL OR {})", ors.join(" OR "))
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
