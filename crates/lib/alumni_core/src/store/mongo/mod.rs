//! MongoDB adapter.
//!
//! Ids are stored as UUID strings in `_id`; timestamps as RFC 3339 strings
//! with fixed microsecond precision so that lexical order is time order.
//! Every driver call is bounded by [`CALL_TIMEOUT`].

mod alumni;
mod file;
mod job;
mod role;

pub use alumni::MongoAlumniRepository;
pub use file::MongoFileRepository;
pub use job::MongoJobRepository;
pub use role::MongoRoleRepository;

use std::future::IntoFuture;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::info;
use uuid::Uuid;

use super::StoreError;
use crate::listing::{ListQuery, SortOrder};

/// Upper bound on a single datastore call.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) const ROLES: &str = "roles";
pub(crate) const ALUMNI: &str = "alumni";
pub(crate) const JOBS: &str = "jobs";
pub(crate) const FILES: &str = "files";

/// Run a driver call under [`CALL_TIMEOUT`].
async fn bounded<T, F>(call: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = Result<T, mongodb::error::Error>>,
{
    match tokio::time::timeout(CALL_TIMEOUT, call).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout(CALL_TIMEOUT)),
    }
}

/// Create the unique indexes the other adapters get from the SQL schema.
pub async fn ensure_indexes(db: &Database) -> Result<(), StoreError> {
    let unique = |keys: Document| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };
    let plain = |keys: Document| IndexModel::builder().keys(keys).build();

    bounded(
        db.collection::<Document>(ROLES)
            .create_index(unique(doc! { "name": 1 })),
    )
    .await?;
    let alumni = db.collection::<Document>(ALUMNI);
    bounded(alumni.create_index(unique(doc! { "email": 1 }))).await?;
    bounded(alumni.create_index(unique(doc! { "student_number": 1 }))).await?;
    bounded(alumni.create_index(plain(doc! { "role_id": 1 }))).await?;
    let jobs = db.collection::<Document>(JOBS);
    bounded(jobs.create_index(plain(doc! { "alumni_id": 1, "deleted_at": 1 }))).await?;
    let files = db.collection::<Document>(FILES);
    bounded(files.create_index(unique(doc! { "stored_name": 1 }))).await?;
    bounded(files.create_index(plain(doc! { "alumni_id": 1 }))).await?;
    info!(database = %db.name(), "mongo indexes ensured");
    Ok(())
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Database(format!("bad timestamp {raw:?}: {e}")))
}

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Database(format!("bad id {raw:?}: {e}")))
}

/// Escape regex metacharacters so the search term matches literally.
fn escape_regex(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match across `columns`, or an empty filter.
fn search_filter(query: &ListQuery, columns: &[&str]) -> Document {
    match &query.search {
        Some(term) => {
            let pattern = escape_regex(term);
            let ors: Vec<Document> = columns
                .iter()
                .map(|c| doc! { *c: { "$regex": pattern.as_str(), "$options": "i" } })
                .collect();
            doc! { "$or": ors }
        }
        None => Document::new(),
    }
}

/// Sort document with `_id` as the tiebreaker.
fn sort_doc(query: &ListQuery) -> Document {
    let dir = match query.order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    };
    if query.sort_by == "id" {
        doc! { "_id": dir }
    } else {
        doc! { query.sort_by: dir, "_id": dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListParams;

    #[test]
    fn regex_metacharacters_are_escaped() {
        assert_eq!(escape_regex("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape_regex("PT (Persero)"), "PT \\(Persero\\)");
        assert_eq!(escape_regex("plain"), "plain");
    }

    #[test]
    fn timestamps_sort_lexically() {
        let a = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2025-01-01T00:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(timestamp(a) < timestamp(b));
        assert_eq!(parse_timestamp(&timestamp(b)).unwrap(), b);
    }

    #[test]
    fn search_filter_is_empty_without_term() {
        let q = ListParams::default().resolve(&["id"]);
        assert!(search_filter(&q, &["name"]).is_empty());
    }

    #[test]
    fn search_filter_ors_columns() {
        let q = ListParams {
            search: Some("jaya".into()),
            ..Default::default()
        }
        .resolve(&["id"]);
        let filter = search_filter(&q, &["company", "location"]);
        let ors = filter.get_array("$or").unwrap();
        assert_eq!(ors.len(), 2);
    }

    #[test]
    fn sort_doc_maps_id_to_primary_key() {
        let q = ListParams {
            sort_by: Some("company".into()),
            order: Some("desc".into()),
            ..Default::default()
        }
        .resolve(&["id", "company"]);
        assert_eq!(sort_doc(&q), doc! { "company": -1, "_id": -1 });
    }
}
