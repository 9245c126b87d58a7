//! Alumni (identity) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InvalidInput, non_blank, require};

/// Sortable columns for alumni listings.
pub const ALUMNI_SORT_COLUMNS: &[&str] = &[
    "id",
    "student_number",
    "name",
    "email",
    "major",
    "entry_year",
    "graduation_year",
    "created_at",
];

/// Columns searched by the `search` query parameter.
pub const ALUMNI_SEARCH_COLUMNS: &[&str] = &["name", "email", "student_number", "major"];

/// A graduate's account record.
///
/// `role` is the role name resolved from `role_id` when the record is read.
/// `password_hash` is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Alumni {
    pub id: Uuid,
    pub student_number: String,
    pub name: String,
    pub major: String,
    pub entry_year: i32,
    pub graduation_year: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store input for a new alumni. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAlumni {
    pub student_number: String,
    pub name: String,
    pub major: String,
    pub entry_year: i32,
    pub graduation_year: i32,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role_id: Uuid,
}

/// Store input for an alumni update. Passwords are not changed here.
#[derive(Debug, Clone)]
pub struct AlumniChanges {
    pub student_number: String,
    pub name: String,
    pub major: String,
    pub entry_year: i32,
    pub graduation_year: i32,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role_id: Uuid,
}

/// Body of `POST /alumni`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlumniRequest {
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub major: String,
    pub entry_year: i32,
    pub graduation_year: i32,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Defaults to the `user` role when omitted.
    pub role_id: Option<Uuid>,
}

/// Body of `PUT /alumni/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAlumniRequest {
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub major: String,
    pub entry_year: i32,
    pub graduation_year: i32,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Keeps the current role when omitted.
    pub role_id: Option<Uuid>,
}

fn validate_profile(
    student_number: &str,
    name: &str,
    major: &str,
    email: &str,
    entry_year: i32,
    graduation_year: i32,
) -> Result<(), InvalidInput> {
    require("student_number", student_number)?;
    require("name", name)?;
    require("major", major)?;
    require("email", email)?;
    if !email.contains('@') {
        return Err(InvalidInput("email is not a valid address".into()));
    }
    if graduation_year < entry_year {
        return Err(InvalidInput(
            "graduation_year must not be before entry_year".into(),
        ));
    }
    Ok(())
}

impl CreateAlumniRequest {
    /// Check required fields and normalise whitespace.
    pub fn validate(mut self) -> Result<Self, InvalidInput> {
        validate_profile(
            &self.student_number,
            &self.name,
            &self.major,
            &self.email,
            self.entry_year,
            self.graduation_year,
        )?;
        require("password", &self.password)?;
        self.student_number = self.student_number.trim().to_string();
        self.name = self.name.trim().to_string();
        self.major = self.major.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = non_blank(self.phone);
        self.address = non_blank(self.address);
        Ok(self)
    }

    /// Store input once the password has been hashed and the role resolved.
    pub fn into_new(self, password_hash: String, role_id: Uuid) -> NewAlumni {
        NewAlumni {
            student_number: self.student_number,
            name: self.name,
            major: self.major,
            entry_year: self.entry_year,
            graduation_year: self.graduation_year,
            email: self.email,
            password_hash,
            phone: self.phone,
            address: self.address,
            role_id,
        }
    }
}

impl UpdateAlumniRequest {
    /// Check required fields and build the store input.
    pub fn validate(self, current_role: Uuid) -> Result<AlumniChanges, InvalidInput> {
        validate_profile(
            &self.student_number,
            &self.name,
            &self.major,
            &self.email,
            self.entry_year,
            self.graduation_year,
        )?;
        Ok(AlumniChanges {
            student_number: self.student_number.trim().to_string(),
            name: self.name.trim().to_string(),
            major: self.major.trim().to_string(),
            entry_year: self.entry_year,
            graduation_year: self.graduation_year,
            email: self.email.trim().to_lowercase(),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            role_id: self.role_id.unwrap_or(current_role),
        })
    }
}
