//! Job record collection. A null `deleted_at` marks an active record.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    ALUMNI, JOBS, bounded, parse_timestamp, parse_uuid, search_filter, sort_doc, timestamp,
};
use crate::listing::{ListQuery, Page};
use crate::models::job::JOB_SEARCH_COLUMNS;
use crate::models::{Job, JobChanges, JobStatus, NewJob};
use crate::store::{JobRepository, StoreError};
use crate::uuid::uuidv7;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JobDoc {
    #[serde(rename = "_id")]
    id: String,
    alumni_id: String,
    company: String,
    position: String,
    industry: String,
    location: String,
    salary_range: Option<String>,
    start_date: String,
    end_date: Option<String>,
    status: JobStatus,
    description: Option<String>,
    deleted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| StoreError::Database(format!("bad date {raw:?}: {e}")))
}

fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

impl TryFrom<JobDoc> for Job {
    type Error = StoreError;

    fn try_from(d: JobDoc) -> Result<Self, Self::Error> {
        Ok(Job {
            id: parse_uuid(&d.id)?,
            alumni_id: parse_uuid(&d.alumni_id)?,
            company: d.company,
            position: d.position,
            industry: d.industry,
            location: d.location,
            salary_range: d.salary_range,
            start_date: parse_date(&d.start_date)?,
            end_date: d.end_date.as_deref().map(parse_date).transpose()?,
            status: d.status,
            description: d.description,
            deleted_at: d.deleted_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&d.created_at)?,
            updated_at: parse_timestamp(&d.updated_at)?,
        })
    }
}

fn changes_doc(changes: &JobChanges) -> Document {
    doc! {
        "alumni_id": changes.alumni_id.to_string(),
        "company": changes.company.as_str(),
        "position": changes.position.as_str(),
        "industry": changes.industry.as_str(),
        "location": changes.location.as_str(),
        "salary_range": changes.salary_range.as_deref(),
        "start_date": format_date(changes.start_date),
        "end_date": changes.end_date.map(format_date),
        "status": changes.status.as_str(),
        "description": changes.description.as_deref(),
        "updated_at": timestamp(Utc::now()),
    }
}

fn collect(docs: Vec<JobDoc>) -> Result<Vec<Job>, StoreError> {
    docs.into_iter().map(Job::try_from).collect()
}

#[derive(Debug, Clone)]
pub struct MongoJobRepository {
    jobs: Collection<JobDoc>,
    alumni: Collection<Document>,
}

impl MongoJobRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            jobs: db.collection(JOBS),
            alumni: db.collection(ALUMNI),
        }
    }

    async fn ensure_alumni(&self, alumni_id: Uuid) -> Result<(), StoreError> {
        let n = bounded(
            self.alumni
                .count_documents(doc! { "_id": alumni_id.to_string() }),
        )
        .await?;
        if n == 0 {
            return Err(StoreError::Conflict("alumni does not exist".into()));
        }
        Ok(())
    }

    async fn find(&self, filter: Document, sort: Document) -> Result<Vec<Job>, StoreError> {
        let docs: Vec<JobDoc> = bounded(async {
            self.jobs.find(filter).sort(sort).await?.try_collect::<Vec<_>>().await
        })
        .await?;
        collect(docs)
    }
}

#[async_trait]
impl JobRepository for MongoJobRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Job>, StoreError> {
        let mut filter = search_filter(query, JOB_SEARCH_COLUMNS);
        filter.insert("deleted_at", Bson::Null);
        let total = bounded(self.jobs.count_documents(filter.clone())).await?;
        let docs: Vec<JobDoc> = bounded(async {
            self.jobs
                .find(filter)
                .sort(sort_doc(query))
                .skip(query.offset())
                .limit(i64::from(query.limit))
                .await?
                .try_collect::<Vec<_>>()
                .await
        })
        .await?;
        Ok(Page {
            items: collect(docs)?,
            total,
        })
    }

    async fn list_trash(&self, owner: Option<Uuid>) -> Result<Vec<Job>, StoreError> {
        let mut filter = doc! { "deleted_at": { "$ne": Bson::Null } };
        if let Some(owner) = owner {
            filter.insert("alumni_id", owner.to_string());
        }
        self.find(filter, doc! { "deleted_at": -1, "_id": -1 }).await
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<Job>, StoreError> {
        self.find(
            doc! { "alumni_id": alumni_id.to_string(), "deleted_at": Bson::Null },
            doc! { "start_date": -1, "_id": -1 },
        )
        .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        bounded(self.jobs.find_one(doc! { "_id": id.to_string() }))
            .await?
            .map(Job::try_from)
            .transpose()
    }

    async fn create(&self, input: NewJob) -> Result<Job, StoreError> {
        self.ensure_alumni(input.alumni_id).await?;
        let now = timestamp(Utc::now());
        let d = JobDoc {
            id: uuidv7().to_string(),
            alumni_id: input.alumni_id.to_string(),
            company: input.company,
            position: input.position,
            industry: input.industry,
            location: input.location,
            salary_range: input.salary_range,
            start_date: format_date(input.start_date),
            end_date: input.end_date.map(format_date),
            status: input.status,
            description: input.description,
            deleted_at: None,
            created_at: now.clone(),
            updated_at: now,
        };
        bounded(self.jobs.insert_one(&d)).await?;
        Job::try_from(d)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Option<Job>, StoreError> {
        self.ensure_alumni(changes.alumni_id).await?;
        bounded(
            self.jobs
                .find_one_and_update(
                    doc! { "_id": id.to_string(), "deleted_at": Bson::Null },
                    doc! { "$set": changes_doc(&changes) },
                )
                .return_document(ReturnDocument::After),
        )
        .await?
        .map(Job::try_from)
        .transpose()
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let now = timestamp(Utc::now());
        bounded(
            self.jobs
                .find_one_and_update(
                    doc! { "_id": id.to_string(), "deleted_at": Bson::Null },
                    doc! { "$set": { "deleted_at": now.as_str(), "updated_at": now.as_str() } },
                )
                .return_document(ReturnDocument::After),
        )
        .await?
        .map(Job::try_from)
        .transpose()
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        bounded(
            self.jobs
                .find_one_and_update(
                    doc! { "_id": id.to_string(), "deleted_at": { "$ne": Bson::Null } },
                    doc! { "$set": { "deleted_at": Bson::Null, "updated_at": timestamp(Utc::now()) } },
                )
                .return_document(ReturnDocument::After),
        )
        .await?
        .map(Job::try_from)
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = bounded(self.jobs.delete_one(doc! { "_id": id.to_string() })).await?;
        Ok(result.deleted_count > 0)
    }
}
