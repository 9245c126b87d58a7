//! Job ("pekerjaan alumni") records: one employment-history entry per row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InvalidInput, non_blank, require};

/// Sortable columns for job listings.
pub const JOB_SORT_COLUMNS: &[&str] = &[
    "id",
    "alumni_id",
    "company",
    "position",
    "industry",
    "location",
    "start_date",
    "status",
    "created_at",
];

/// Columns searched by the `search` query parameter.
pub const JOB_SEARCH_COLUMNS: &[&str] = &["company", "position", "industry", "location"];

// =============================================================================
// Enums
// =============================================================================

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status")]
pub enum JobStatus {
    #[sqlx(rename = "aktif")]
    #[serde(rename = "aktif")]
    Active,
    #[sqlx(rename = "selesai")]
    #[serde(rename = "selesai")]
    Finished,
    #[sqlx(rename = "resigned")]
    #[serde(rename = "resigned")]
    Resigned,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "aktif",
            Self::Finished => "selesai",
            Self::Resigned => "resigned",
        }
    }
}

/// Lifecycle state derived from the deletion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Active,
    SoftDeleted,
}

// =============================================================================
// Records
// =============================================================================

/// A stored job record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub company: String,
    pub position: String,
    pub industry: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub description: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn state(&self) -> JobState {
        if self.deleted_at.is_some() {
            JobState::SoftDeleted
        } else {
            JobState::Active
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.state() == JobState::SoftDeleted
    }
}

/// Editable job fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobChanges {
    pub alumni_id: Uuid,
    pub company: String,
    pub position: String,
    pub industry: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub description: Option<String>,
}

/// Store input for a new job record.
pub type NewJob = JobChanges;

/// Body of `POST /jobs` and `PUT /jobs/{id}`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRequest {
    pub alumni_id: Uuid,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub description: Option<String>,
}

impl JobRequest {
    /// Check required fields and date ordering.
    pub fn validate(self) -> Result<JobChanges, InvalidInput> {
        require("company", &self.company)?;
        require("position", &self.position)?;
        require("industry", &self.industry)?;
        require("location", &self.location)?;
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(InvalidInput(
                "end_date must not be before start_date".into(),
            ));
        }
        Ok(JobChanges {
            alumni_id: self.alumni_id,
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            industry: self.industry.trim().to_string(),
            location: self.location.trim().to_string(),
            salary_range: non_blank(self.salary_range),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            description: non_blank(self.description),
        })
    }
}
