//! Built-in roles and optional demo data.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::auth::AuthError;
use crate::auth::password::hash_password;
use crate::auth::policy::{ROLE_ADMIN, ROLE_USER};
use crate::models::{JobStatus, NewAlumni, NewJob, Role};
use crate::store::{RoleRepository, Store, StoreError};

/// Default password for seeded accounts when none is configured.
pub const DEFAULT_SEED_PASSWORD: &str = "changeme123";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// The two built-in roles.
#[derive(Debug, Clone)]
pub struct BuiltinRoles {
    pub admin: Role,
    pub user: Role,
}

async fn find_or_create(roles: &dyn RoleRepository, name: &str) -> Result<Role, StoreError> {
    if let Some(role) = roles.find_by_name(name).await? {
        return Ok(role);
    }
    let role = roles.create(name).await?;
    info!(role = name, "created built-in role");
    Ok(role)
}

/// Make sure the `admin` and `user` roles exist.
pub async fn ensure_roles(store: &Store) -> Result<BuiltinRoles, StoreError> {
    Ok(BuiltinRoles {
        admin: find_or_create(store.roles.as_ref(), ROLE_ADMIN).await?,
        user: find_or_create(store.roles.as_ref(), ROLE_USER).await?,
    })
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Insert a demo administrator and user with one job record each.
///
/// Does nothing when any alumni already exists. Returns whether data was
/// inserted.
pub async fn seed_demo(store: &Store, password: &str) -> Result<bool, SeedError> {
    if store.alumni.count().await? > 0 {
        info!("store already holds alumni, skipping demo seed");
        return Ok(false);
    }
    let roles = ensure_roles(store).await?;
    let password_hash = hash_password(password)?;

    let admin = store
        .alumni
        .create(NewAlumni {
            student_number: "000000001".into(),
            name: "Administrator".into(),
            major: "Sistem Informasi".into(),
            entry_year: 2010,
            graduation_year: 2014,
            email: "admin@example.com".into(),
            password_hash: password_hash.clone(),
            phone: None,
            address: None,
            role_id: roles.admin.id,
        })
        .await?;
    let user = store
        .alumni
        .create(NewAlumni {
            student_number: "434221001".into(),
            name: "Sari Dewi".into(),
            major: "Teknik Informatika".into(),
            entry_year: 2019,
            graduation_year: 2023,
            email: "sari@example.com".into(),
            password_hash,
            phone: Some("081234567890".into()),
            address: Some("Surabaya".into()),
            role_id: roles.user.id,
        })
        .await?;

    store
        .jobs
        .create(NewJob {
            alumni_id: admin.id,
            company: "Universitas Airlangga".into(),
            position: "Staf TI".into(),
            industry: "Pendidikan".into(),
            location: "Surabaya".into(),
            salary_range: None,
            start_date: date(2014, 9, 1),
            end_date: None,
            status: JobStatus::Active,
            description: Some("Pengelola sistem informasi alumni".into()),
        })
        .await?;
    store
        .jobs
        .create(NewJob {
            alumni_id: user.id,
            company: "PT Maju Jaya".into(),
            position: "Backend Engineer".into(),
            industry: "Teknologi".into(),
            location: "Jakarta".into(),
            salary_range: Some("8-12 juta".into()),
            start_date: date(2023, 8, 1),
            end_date: None,
            status: JobStatus::Active,
            description: None,
        })
        .await?;

    info!(admin = %admin.email, user = %user.email, "seeded demo data");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    #[tokio::test]
    async fn ensure_roles_is_idempotent() {
        let store = Store::memory();
        let first = ensure_roles(&store).await.unwrap();
        let second = ensure_roles(&store).await.unwrap();
        assert_eq!(first.admin.id, second.admin.id);
        assert_eq!(first.user.name, "user");
    }

    #[tokio::test]
    async fn seed_runs_once() {
        let store = Store::memory();
        assert!(seed_demo(&store, "rahasia123").await.unwrap());
        assert!(!seed_demo(&store, "rahasia123").await.unwrap());
        assert_eq!(store.alumni.count().await.unwrap(), 2);

        let admin = store
            .alumni
            .find_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, "admin");
        assert!(verify_password("rahasia123", &admin.password_hash));
        assert_eq!(store.jobs.list_by_alumni(admin.id).await.unwrap().len(), 1);
    }
}
