use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Paused,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employment_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: JobStatus,
    pub posted_by: Option<Uuid>,
    pub posted_at: DateTime<Utc>,
    pub closing_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    /// Open and not past its closing date.
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Open && self.closing_date.map_or(true, |closing| closing > now)
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub department: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: JobStatus,
    pub posted_by: Option<Uuid>,
    pub closing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: Option<JobStatus>,
    pub closing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub department: Option<String>,
    pub search: Option<String>,
}
