//! Alumni collection. Role names are looked up from `roles` on read.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::RoleDoc;
use super::{
    ALUMNI, FILES, JOBS, ROLES, bounded, parse_timestamp, parse_uuid, search_filter, sort_doc,
    timestamp,
};
use crate::listing::{ListQuery, Page};
use crate::models::alumni::ALUMNI_SEARCH_COLUMNS;
use crate::models::{Alumni, AlumniChanges, NewAlumni};
use crate::store::{AlumniRepository, StoreError};
use crate::uuid::uuidv7;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AlumniDoc {
    #[serde(rename = "_id")]
    id: String,
    student_number: String,
    name: String,
    major: String,
    entry_year: i32,
    graduation_year: i32,
    email: String,
    password_hash: String,
    phone: Option<String>,
    address: Option<String>,
    role_id: String,
    created_at: String,
    updated_at: String,
}

impl AlumniDoc {
    fn into_alumni(self, role: String) -> Result<Alumni, StoreError> {
        Ok(Alumni {
            id: parse_uuid(&self.id)?,
            student_number: self.student_number,
            name: self.name,
            major: self.major,
            entry_year: self.entry_year,
            graduation_year: self.graduation_year,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            address: self.address,
            role_id: parse_uuid(&self.role_id)?,
            role,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MongoAlumniRepository {
    alumni: Collection<AlumniDoc>,
    roles: Collection<RoleDoc>,
    jobs: Collection<Document>,
    files: Collection<Document>,
}

impl MongoAlumniRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            alumni: db.collection(ALUMNI),
            roles: db.collection(ROLES),
            jobs: db.collection(JOBS),
            files: db.collection(FILES),
        }
    }

    /// Role names keyed by role id, for the given ids.
    async fn role_names(&self, ids: Vec<String>) -> Result<HashMap<String, String>, StoreError> {
        let roles: Vec<RoleDoc> = bounded(async {
            self.roles
                .find(doc! { "_id": { "$in": ids } })
                .await?
                .try_collect::<Vec<_>>()
                .await
        })
        .await?;
        Ok(roles.into_iter().map(|r| (r.id, r.name)).collect())
    }

    async fn resolve(&self, docs: Vec<AlumniDoc>) -> Result<Vec<Alumni>, StoreError> {
        let mut ids: Vec<String> = docs.iter().map(|d| d.role_id.clone()).collect();
        ids.sort();
        ids.dedup();
        let names = self.role_names(ids).await?;
        docs.into_iter()
            .map(|d| {
                let role = names.get(&d.role_id).cloned().unwrap_or_default();
                d.into_alumni(role)
            })
            .collect()
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Alumni>, StoreError> {
        match bounded(self.alumni.find_one(filter)).await? {
            Some(d) => Ok(self.resolve(vec![d]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn ensure_role(&self, role_id: Uuid) -> Result<(), StoreError> {
        let n = bounded(
            self.roles
                .count_documents(doc! { "_id": role_id.to_string() }),
        )
        .await?;
        if n == 0 {
            return Err(StoreError::Conflict("role does not exist".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AlumniRepository for MongoAlumniRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Alumni>, StoreError> {
        let filter = search_filter(query, ALUMNI_SEARCH_COLUMNS);
        let total = bounded(self.alumni.count_documents(filter.clone())).await?;
        let docs: Vec<AlumniDoc> = bounded(async {
            self.alumni
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
            items: self.resolve(docs).await?,
            total,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Alumni>, StoreError> {
        self.find_one(doc! { "_id": id.to_string() }).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Alumni>, StoreError> {
        self.find_one(doc! { "email": email.trim().to_lowercase() })
            .await
    }

    async fn find_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<Alumni>, StoreError> {
        self.find_one(doc! { "student_number": student_number })
            .await
    }

    async fn create(&self, input: NewAlumni) -> Result<Alumni, StoreError> {
        self.ensure_role(input.role_id).await?;
        let now = timestamp(Utc::now());
        let d = AlumniDoc {
            id: uuidv7().to_string(),
            student_number: input.student_number,
            name: input.name,
            major: input.major,
            entry_year: input.entry_year,
            graduation_year: input.graduation_year,
            email: input.email,
            password_hash: input.password_hash,
            phone: input.phone,
            address: input.address,
            role_id: input.role_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        bounded(self.alumni.insert_one(&d)).await?;
        self.resolve(vec![d])
            .await?
            .pop()
            .ok_or_else(|| StoreError::Database("inserted alumni could not be read".into()))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
    ) -> Result<Option<Alumni>, StoreError> {
        self.ensure_role(changes.role_id).await?;
        let result = bounded(self.alumni.update_one(
            doc! { "_id": id.to_string() },
            doc! { "$set": {
                "student_number": changes.student_number.as_str(),
                "name": changes.name.as_str(),
                "major": changes.major.as_str(),
                "entry_year": changes.entry_year,
                "graduation_year": changes.graduation_year,
                "email": changes.email.as_str(),
                "phone": changes.phone.as_deref(),
                "address": changes.address.as_deref(),
                "role_id": changes.role_id.to_string(),
                "updated_at": timestamp(Utc::now()),
            } },
        ))
        .await?;
        if result.matched_count == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let key = id.to_string();
        let result = bounded(self.alumni.delete_one(doc! { "_id": key.as_str() })).await?;
        if result.deleted_count == 0 {
            return Ok(false);
        }
        bounded(self.jobs.delete_many(doc! { "alumni_id": key.as_str() })).await?;
        bounded(self.files.delete_many(doc! { "alumni_id": key.as_str() })).await?;
        Ok(true)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        bounded(self.alumni.count_documents(doc! {})).await
    }
}
