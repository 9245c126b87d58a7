//! In-memory adapter backed by `tokio::sync::RwLock` maps.
//!
//! Used by tests and by `STORE=memory` local runs. Honours the same
//! uniqueness, reference, search and soft-delete rules as the SQL schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AlumniRepository, FileRepository, JobRepository, RoleRepository, StoreError};
use crate::listing::{ListQuery, Page, SortOrder};
use crate::models::{
    Alumni, AlumniChanges, FileRecord, Job, JobChanges, NewAlumni, NewFile, NewJob, Role,
};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
struct Tables {
    roles: HashMap<Uuid, Role>,
    alumni: HashMap<Uuid, Alumni>,
    jobs: HashMap<Uuid, Job>,
    files: HashMap<Uuid, FileRecord>,
}

impl Tables {
    fn role_name(&self, role_id: Uuid) -> String {
        self.roles
            .get(&role_id)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    fn with_role(&self, alumni: &Alumni) -> Alumni {
        let mut out = alumni.clone();
        out.role = self.role_name(alumni.role_id);
        out
    }

    fn check_alumni_unique(
        &self,
        skip: Option<Uuid>,
        email: &str,
        student_number: &str,
    ) -> Result<(), StoreError> {
        for a in self.alumni.values().filter(|a| Some(a.id) != skip) {
            if a.email.eq_ignore_ascii_case(email) {
                return Err(StoreError::Conflict("email already registered".into()));
            }
            if a.student_number == student_number {
                return Err(StoreError::Conflict(
                    "student number already registered".into(),
                ));
            }
        }
        Ok(())
    }

    fn check_role_exists(&self, role_id: Uuid) -> Result<(), StoreError> {
        if !self.roles.contains_key(&role_id) {
            return Err(StoreError::Conflict("role does not exist".into()));
        }
        Ok(())
    }

    fn check_alumni_exists(&self, alumni_id: Uuid) -> Result<(), StoreError> {
        if !self.alumni.contains_key(&alumni_id) {
            return Err(StoreError::Conflict("alumni does not exist".into()));
        }
        Ok(())
    }
}

/// Shared handle to the in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Listing helpers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Id(Uuid),
    Text(String),
    Int(i64),
    Date(NaiveDate),
    Time(DateTime<Utc>),
}

trait Listable: Clone {
    fn id(&self) -> Uuid;
    fn sort_value(&self, column: &str) -> SortValue;
    /// Lower-cased values of the searchable columns.
    fn search_fields(&self) -> Vec<String>;
}

fn paginate<T: Listable>(items: impl Iterator<Item = T>, query: &ListQuery) -> Page<T> {
    let needle = query.search.as_ref().map(|s| s.to_lowercase());
    let mut matched: Vec<T> = items
        .filter(|item| match &needle {
            Some(n) => item.search_fields().iter().any(|f| f.contains(n.as_str())),
            None => true,
        })
        .collect();
    matched.sort_by(|a, b| {
        let ord = a
            .sort_value(query.sort_by)
            .cmp(&b.sort_value(query.sort_by))
            .then_with(|| a.id().cmp(&b.id()));
        match query.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    let total = matched.len() as u64;
    let items = matched
        .into_iter()
        .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
        .take(query.limit as usize)
        .collect();
    Page { items, total }
}

impl Listable for Alumni {
    fn id(&self) -> Uuid {
        self.id
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "student_number" => SortValue::Text(self.student_number.clone()),
            "name" => SortValue::Text(self.name.clone()),
            "email" => SortValue::Text(self.email.clone()),
            "major" => SortValue::Text(self.major.clone()),
            "entry_year" => SortValue::Int(self.entry_year.into()),
            "graduation_year" => SortValue::Int(self.graduation_year.into()),
            "created_at" => SortValue::Time(self.created_at),
            _ => SortValue::Id(self.id),
        }
    }

    fn search_fields(&self) -> Vec<String> {
        [&self.name, &self.email, &self.student_number, &self.major]
            .iter()
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl Listable for Role {
    fn id(&self) -> Uuid {
        self.id
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::Text(self.name.clone()),
            "created_at" => SortValue::Time(self.created_at),
            _ => SortValue::Id(self.id),
        }
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.name.to_lowercase()]
    }
}

impl Listable for Job {
    fn id(&self) -> Uuid {
        self.id
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "alumni_id" => SortValue::Id(self.alumni_id),
            "company" => SortValue::Text(self.company.clone()),
            "position" => SortValue::Text(self.position.clone()),
            "industry" => SortValue::Text(self.industry.clone()),
            "location" => SortValue::Text(self.location.clone()),
            "start_date" => SortValue::Date(self.start_date),
            "status" => SortValue::Text(self.status.as_str().to_string()),
            "created_at" => SortValue::Time(self.created_at),
            _ => SortValue::Id(self.id),
        }
    }

    fn search_fields(&self) -> Vec<String> {
        [&self.company, &self.position, &self.industry, &self.location]
            .iter()
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl Listable for FileRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "alumni_id" => SortValue::Id(self.alumni_id),
            "original_name" => SortValue::Text(self.original_name.clone()),
            "size" => SortValue::Int(self.size),
            "category" => SortValue::Text(self.category.as_str().to_string()),
            "created_at" => SortValue::Time(self.created_at),
            _ => SortValue::Id(self.id),
        }
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.original_name.to_lowercase(),
            self.content_type.to_lowercase(),
            self.category.as_str().to_string(),
        ]
    }
}

// =============================================================================
// Alumni
// =============================================================================

#[derive(Debug, Clone)]
pub struct MemoryAlumniRepository {
    db: MemoryDb,
}

impl MemoryAlumniRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlumniRepository for MemoryAlumniRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Alumni>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(paginate(t.alumni.values().map(|a| t.with_role(a)), query))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Alumni>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(t.alumni.get(&id).map(|a| t.with_role(a)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Alumni>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(t.alumni
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .map(|a| t.with_role(a)))
    }

    async fn find_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<Alumni>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(t.alumni
            .values()
            .find(|a| a.student_number == student_number)
            .map(|a| t.with_role(a)))
    }

    async fn create(&self, input: NewAlumni) -> Result<Alumni, StoreError> {
        let mut t = self.db.tables.write().await;
        t.check_alumni_unique(None, &input.email, &input.student_number)?;
        t.check_role_exists(input.role_id)?;
        let now = Utc::now();
        let alumni = Alumni {
            id: uuidv7(),
            student_number: input.student_number,
            name: input.name,
            major: input.major,
            entry_year: input.entry_year,
            graduation_year: input.graduation_year,
            email: input.email,
            password_hash: input.password_hash,
            phone: input.phone,
            address: input.address,
            role_id: input.role_id,
            role: String::new(),
            created_at: now,
            updated_at: now,
        };
        t.alumni.insert(alumni.id, alumni.clone());
        Ok(t.with_role(&alumni))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
    ) -> Result<Option<Alumni>, StoreError> {
        let mut t = self.db.tables.write().await;
        if !t.alumni.contains_key(&id) {
            return Ok(None);
        }
        t.check_alumni_unique(Some(id), &changes.email, &changes.student_number)?;
        t.check_role_exists(changes.role_id)?;
        let Some(a) = t.alumni.get_mut(&id) else {
            return Ok(None);
        };
        a.student_number = changes.student_number;
        a.name = changes.name;
        a.major = changes.major;
        a.entry_year = changes.entry_year;
        a.graduation_year = changes.graduation_year;
        a.email = changes.email;
        a.phone = changes.phone;
        a.address = changes.address;
        a.role_id = changes.role_id;
        a.updated_at = Utc::now();
        let a = a.clone();
        Ok(Some(t.with_role(&a)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.db.tables.write().await;
        if t.alumni.remove(&id).is_none() {
            return Ok(false);
        }
        // Owned records go with the alumni, as ON DELETE CASCADE does.
        t.jobs.retain(|_, j| j.alumni_id != id);
        t.files.retain(|_, f| f.alumni_id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.db.tables.read().await.alumni.len() as u64)
    }
}

// =============================================================================
// Roles
// =============================================================================

#[derive(Debug, Clone)]
pub struct MemoryRoleRepository {
    db: MemoryDb,
}

impl MemoryRoleRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for MemoryRoleRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Role>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(paginate(t.roles.values().cloned(), query))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        Ok(self.db.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(t.roles.values().find(|r| r.name == name).cloned())
    }

    async fn create(&self, name: &str) -> Result<Role, StoreError> {
        let mut t = self.db.tables.write().await;
        if t.roles.values().any(|r| r.name == name) {
            return Err(StoreError::Conflict(format!("role {name} already exists")));
        }
        let now = Utc::now();
        let role = Role {
            id: uuidv7(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update(&self, id: Uuid, name: &str) -> Result<Option<Role>, StoreError> {
        let mut t = self.db.tables.write().await;
        if t.roles.values().any(|r| r.name == name && r.id != id) {
            return Err(StoreError::Conflict(format!("role {name} already exists")));
        }
        Ok(t.roles.get_mut(&id).map(|r| {
            r.name = name.to_string();
            r.updated_at = Utc::now();
            r.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.db.tables.write().await;
        if t.alumni.values().any(|a| a.role_id == id) {
            return Err(StoreError::Conflict(
                "role is still assigned to alumni".into(),
            ));
        }
        Ok(t.roles.remove(&id).is_some())
    }
}

// =============================================================================
// Jobs
// =============================================================================

#[derive(Debug, Clone)]
pub struct MemoryJobRepository {
    db: MemoryDb,
}

impl MemoryJobRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

fn apply_job_changes(job: &mut Job, changes: JobChanges) {
    job.alumni_id = changes.alumni_id;
    job.company = changes.company;
    job.position = changes.position;
    job.industry = changes.industry;
    job.location = changes.location;
    job.salary_range = changes.salary_range;
    job.start_date = changes.start_date;
    job.end_date = changes.end_date;
    job.status = changes.status;
    job.description = changes.description;
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Job>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(paginate(
            t.jobs.values().filter(|j| !j.is_deleted()).cloned(),
            query,
        ))
    }

    async fn list_trash(&self, owner: Option<Uuid>) -> Result<Vec<Job>, StoreError> {
        let t = self.db.tables.read().await;
        let mut out: Vec<Job> = t
            .jobs
            .values()
            .filter(|j| j.is_deleted())
            .filter(|j| owner.is_none_or(|o| j.alumni_id == o))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let t = self.db.tables.read().await;
        let mut out: Vec<Job> = t
            .jobs
            .values()
            .filter(|j| j.alumni_id == alumni_id && !j.is_deleted())
            .cloned()
            .collect();
        out.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.db.tables.read().await.jobs.get(&id).cloned())
    }

    async fn create(&self, input: NewJob) -> Result<Job, StoreError> {
        let mut t = self.db.tables.write().await;
        t.check_alumni_exists(input.alumni_id)?;
        let now = Utc::now();
        let mut job = Job {
            id: uuidv7(),
            alumni_id: input.alumni_id,
            company: String::new(),
            position: String::new(),
            industry: String::new(),
            location: String::new(),
            salary_range: None,
            start_date: input.start_date,
            end_date: None,
            status: input.status,
            description: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        apply_job_changes(&mut job, input);
        t.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn update(&self, id: Uuid, changes: JobChanges) -> Result<Option<Job>, StoreError> {
        let mut t = self.db.tables.write().await;
        t.check_alumni_exists(changes.alumni_id)?;
        Ok(t
            .jobs
            .get_mut(&id)
            .filter(|j| !j.is_deleted())
            .map(|j| {
                apply_job_changes(j, changes);
                j.updated_at = Utc::now();
                j.clone()
            }))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let mut t = self.db.tables.write().await;
        Ok(t
            .jobs
            .get_mut(&id)
            .filter(|j| !j.is_deleted())
            .map(|j| {
                let now = Utc::now();
                j.deleted_at = Some(now);
                j.updated_at = now;
                j.clone()
            }))
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let mut t = self.db.tables.write().await;
        Ok(t
            .jobs
            .get_mut(&id)
            .filter(|j| j.is_deleted())
            .map(|j| {
                j.deleted_at = None;
                j.updated_at = Utc::now();
                j.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.db.tables.write().await.jobs.remove(&id).is_some())
    }
}

// =============================================================================
// Files
// =============================================================================

#[derive(Debug, Clone)]
pub struct MemoryFileRepository {
    db: MemoryDb,
}

impl MemoryFileRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<FileRecord>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(paginate(t.files.values().cloned(), query))
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError> {
        Ok(self.db.tables.read().await.files.get(&id).cloned())
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<FileRecord>, StoreError> {
        let t = self.db.tables.read().await;
        let mut out: Vec<FileRecord> = t
            .files
            .values()
            .filter(|f| f.alumni_id == alumni_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn create(&self, input: NewFile) -> Result<FileRecord, StoreError> {
        let mut t = self.db.tables.write().await;
        t.check_alumni_exists(input.alumni_id)?;
        if t.files.values().any(|f| f.stored_name == input.stored_name) {
            return Err(StoreError::Conflict("stored name already in use".into()));
        }
        let now = Utc::now();
        let file = FileRecord {
            id: input.id,
            alumni_id: input.alumni_id,
            stored_name: input.stored_name,
            original_name: input.original_name,
            storage_path: input.storage_path,
            size: input.size,
            content_type: input.content_type,
            category: input.category,
            created_at: now,
            updated_at: now,
        };
        t.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.db.tables.write().await.files.remove(&id).is_some())
    }

    async fn stored_names(&self) -> Result<Vec<String>, StoreError> {
        let t = self.db.tables.read().await;
        Ok(t.files.values().map(|f| f.stored_name.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListParams;
    use crate::models::alumni::ALUMNI_SORT_COLUMNS;
    use crate::models::job::JOB_SORT_COLUMNS;
    use crate::models::{FileCategory, JobStatus};
    use crate::store::Store;

    async fn seeded() -> (Store, Role) {
        let store = Store::memory();
        let role = store.roles.create("user").await.unwrap();
        (store, role)
    }

    fn new_alumni(n: u32, role_id: Uuid) -> NewAlumni {
        NewAlumni {
            student_number: format!("43422{n:04}"),
            name: format!("Alumni {n}"),
            major: if n % 2 == 0 { "Informatika" } else { "Sipil" }.into(),
            entry_year: 2015 + (n as i32 % 5),
            graduation_year: 2020,
            email: format!("alumni{n}@example.com"),
            password_hash: "hash".into(),
            phone: None,
            address: None,
            role_id,
        }
    }

    fn new_job(alumni_id: Uuid, company: &str, start: &str) -> NewJob {
        NewJob {
            alumni_id,
            company: company.into(),
            position: "Engineer".into(),
            industry: "Teknologi".into(),
            location: "Jakarta".into(),
            salary_range: None,
            start_date: start.parse().unwrap(),
            end_date: None,
            status: JobStatus::Active,
            description: None,
        }
    }

    fn query(sort: &str, order: &str, search: Option<&str>, page: &str) -> ListQuery {
        ListParams {
            page: Some(page.into()),
            limit: Some("10".into()),
            sort_by: Some(sort.into()),
            order: Some(order.into()),
            search: search.map(str::to_string),
        }
        .resolve(ALUMNI_SORT_COLUMNS)
    }

    #[tokio::test]
    async fn role_name_is_resolved_on_read() {
        let (store, role) = seeded().await;
        let created = store.alumni.create(new_alumni(1, role.id)).await.unwrap();
        assert_eq!(created.role, "user");
        store.roles.update(role.id, "member").await.unwrap();
        let fetched = store.alumni.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, "member");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (store, role) = seeded().await;
        store.alumni.create(new_alumni(1, role.id)).await.unwrap();
        let mut dup = new_alumni(2, role.id);
        dup.email = "ALUMNI1@example.com".into();
        let err = store.alumni.create(dup).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_role_conflicts() {
        let (store, _) = seeded().await;
        let err = store
            .alumni
            .create(new_alumni(1, Uuid::now_v7()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_paginates_and_counts() {
        let (store, role) = seeded().await;
        for n in 0..23 {
            store.alumni.create(new_alumni(n, role.id)).await.unwrap();
        }
        let page = store
            .alumni
            .list(&query("student_number", "asc", None, "3"))
            .await
            .unwrap();
        assert_eq!(page.total, 23);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].student_number, "434220020");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_columns() {
        let (store, role) = seeded().await;
        for n in 0..6 {
            store.alumni.create(new_alumni(n, role.id)).await.unwrap();
        }
        let page = store
            .alumni
            .list(&query("id", "asc", Some("INFORMATIKA"), "1"))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        let page = store
            .alumni
            .list(&query("id", "asc", Some("alumni4@"), "1"))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn sort_descending() {
        let (store, role) = seeded().await;
        for n in 0..5 {
            store.alumni.create(new_alumni(n, role.id)).await.unwrap();
        }
        let page = store
            .alumni
            .list(&query("name", "desc", None, "1"))
            .await
            .unwrap();
        assert_eq!(page.items[0].name, "Alumni 4");
        assert_eq!(page.items[4].name, "Alumni 0");
    }

    #[tokio::test]
    async fn role_in_use_cannot_be_deleted() {
        let (store, role) = seeded().await;
        store.alumni.create(new_alumni(1, role.id)).await.unwrap();
        let err = store.roles.delete(role.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn soft_delete_applies_once() {
        let (store, role) = seeded().await;
        let a = store.alumni.create(new_alumni(1, role.id)).await.unwrap();
        let job = store
            .jobs
            .create(new_job(a.id, "PT Maju", "2025-01-15"))
            .await
            .unwrap();
        let deleted = store.jobs.soft_delete(job.id).await.unwrap().unwrap();
        assert!(deleted.deleted_at.is_some());
        assert!(store.jobs.soft_delete(job.id).await.unwrap().is_none());

        let listed = store
            .jobs
            .list(&ListParams::default().resolve(JOB_SORT_COLUMNS))
            .await
            .unwrap();
        assert_eq!(listed.total, 0);
        assert_eq!(store.jobs.list_trash(Some(a.id)).await.unwrap().len(), 1);
        assert!(store.jobs.list_trash(Some(Uuid::now_v7())).await.unwrap().is_empty());

        let restored = store.jobs.restore(job.id).await.unwrap().unwrap();
        assert!(restored.deleted_at.is_none());
        assert!(store.jobs.restore(job.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn jobs_by_alumni_newest_first() {
        let (store, role) = seeded().await;
        let a = store.alumni.create(new_alumni(1, role.id)).await.unwrap();
        store.jobs.create(new_job(a.id, "Old", "2019-03-01")).await.unwrap();
        store.jobs.create(new_job(a.id, "New", "2024-07-01")).await.unwrap();
        let jobs = store.jobs.list_by_alumni(a.id).await.unwrap();
        assert_eq!(jobs[0].company, "New");
        assert_eq!(jobs[1].company, "Old");
    }

    #[tokio::test]
    async fn deleting_alumni_cascades() {
        let (store, role) = seeded().await;
        let a = store.alumni.create(new_alumni(1, role.id)).await.unwrap();
        let job = store
            .jobs
            .create(new_job(a.id, "PT Maju", "2025-01-15"))
            .await
            .unwrap();
        let file = store
            .files
            .create(NewFile {
                id: Uuid::now_v7(),
                alumni_id: a.id,
                stored_name: "x.pdf".into(),
                original_name: "cv.pdf".into(),
                storage_path: "uploads/sertifikat/x.pdf".into(),
                size: 10,
                content_type: "application/pdf".into(),
                category: FileCategory::Certificate,
            })
            .await
            .unwrap();
        assert!(store.alumni.delete(a.id).await.unwrap());
        assert!(store.jobs.get(job.id).await.unwrap().is_none());
        assert!(store.files.get(file.id).await.unwrap().is_none());
        assert!(!store.alumni.delete(a.id).await.unwrap());
    }
}
