//! Role collection.

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ALUMNI, ROLES, bounded, parse_timestamp, parse_uuid, search_filter, sort_doc, timestamp};
use crate::listing::{ListQuery, Page};
use crate::models::Role;
use crate::models::role::ROLE_SEARCH_COLUMNS;
use crate::store::{RoleRepository, StoreError};
use crate::uuid::uuidv7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct RoleDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<RoleDoc> for Role {
    type Error = StoreError;

    fn try_from(d: RoleDoc) -> Result<Self, Self::Error> {
        Ok(Role {
            id: parse_uuid(&d.id)?,
            name: d.name,
            created_at: parse_timestamp(&d.created_at)?,
            updated_at: parse_timestamp(&d.updated_at)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MongoRoleRepository {
    roles: Collection<RoleDoc>,
    alumni: Collection<Document>,
}

impl MongoRoleRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            roles: db.collection(ROLES),
            alumni: db.collection(ALUMNI),
        }
    }
}

#[async_trait]
impl RoleRepository for MongoRoleRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Role>, StoreError> {
        let filter = search_filter(query, ROLE_SEARCH_COLUMNS);
        let total = bounded(self.roles.count_documents(filter.clone())).await?;
        let docs: Vec<RoleDoc> = bounded(async {
            self.roles
                .find(filter)
                .sort(sort_doc(query))
                .skip(query.offset())
                .limit(i64::from(query.limit))
                .await?
                .try_collect::<Vec<_>>()
                .await
        })
        .await?;
        let items = docs
            .into_iter()
            .map(Role::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Page { items, total })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        bounded(self.roles.find_one(doc! { "_id": id.to_string() }))
            .await?
            .map(Role::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        bounded(self.roles.find_one(doc! { "name": name }))
            .await?
            .map(Role::try_from)
            .transpose()
    }

    async fn create(&self, name: &str) -> Result<Role, StoreError> {
        let now = timestamp(Utc::now());
        let d = RoleDoc {
            id: uuidv7().to_string(),
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        bounded(self.roles.insert_one(&d)).await?;
        Role::try_from(d)
    }

    async fn update(&self, id: Uuid, name: &str) -> Result<Option<Role>, StoreError> {
        bounded(
            self.roles
                .find_one_and_update(
                    doc! { "_id": id.to_string() },
                    doc! { "$set": { "name": name, "updated_at": timestamp(Utc::now()) } },
                )
                .return_document(ReturnDocument::After),
        )
        .await?
        .map(Role::try_from)
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let in_use = bounded(
            self.alumni
                .count_documents(doc! { "role_id": id.to_string() }),
        )
        .await?;
        if in_use > 0 {
            return Err(StoreError::Conflict(
                "role is still assigned to alumni".into(),
            ));
        }
        let result = bounded(self.roles.delete_one(doc! { "_id": id.to_string() })).await?;
        Ok(result.deleted_count > 0)
    }
}
