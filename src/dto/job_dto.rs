use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{EmploymentType, JobPosting, JobStatus};
use crate::services::job_service::JobList;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub department: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: Option<JobStatus>,
    pub closing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: Option<JobStatus>,
    pub closing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
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

/// What anonymous visitors see of a posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicJobSummary {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub summary: String,
    pub posted_at: DateTime<Utc>,
    pub closing_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<JobResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicJobListResponse {
    pub items: Vec<PublicJobSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<JobStatus>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PublicJobQuery {
    pub limit: Option<i64>,
}

impl From<JobPosting> for JobResponse {
    fn from(value: JobPosting) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            department: value.department,
            location: value.location,
            employment_type: value.employment_type,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            requirements: value.requirements,
            benefits: value.benefits,
            status: value.status,
            posted_by: value.posted_by,
            posted_at: value.posted_at,
            closing_date: value.closing_date,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

const SUMMARY_CHARS: usize = 320;

impl From<JobPosting> for PublicJobSummary {
    fn from(value: JobPosting) -> Self {
        let trimmed = value.description.trim();
        let summary = if trimmed.chars().count() > SUMMARY_CHARS {
            format!("{}…", trimmed.chars().take(SUMMARY_CHARS).collect::<String>())
        } else {
            trimmed.to_string()
        };

        Self {
            id: value.id,
            title: value.title,
            department: value.department,
            location: value.location,
            employment_type: value.employment_type,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            summary,
            posted_at: value.posted_at,
            closing_date: value.closing_date,
        }
    }
}

impl From<JobList> for JobListResponse {
    fn from(value: JobList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
