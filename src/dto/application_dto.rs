use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};

/// Text fields of the public multipart submission form.
#[derive(Debug, Clone, Default, Validate)]
pub struct ApplicationSubmission {
    pub job_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub candidate_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub candidate_email: String,
    #[validate(length(max = 50))]
    pub candidate_phone: Option<String>,
    #[validate(length(min = 1, message = "Cover letter is required"))]
    pub cover_letter: String,
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateApplicationStatusPayload {
    #[validate(length(min = 1))]
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub cover_letter: String,
    pub has_resume: bool,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub items: Vec<ApplicationResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub job_id: Option<Uuid>,
    pub status: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateApplicationsQuery {
    pub email: Option<String>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            job_id: value.job_id,
            candidate_name: value.candidate_name,
            candidate_email: value.candidate_email,
            candidate_phone: value.candidate_phone,
            cover_letter: value.cover_letter,
            has_resume: value.resume_path.is_some(),
            status: value.status,
            notes: value.notes,
            applied_at: value.applied_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Vec<Application>> for ApplicationListResponse {
    fn from(value: Vec<Application>) -> Self {
        Self {
            total: value.len(),
            items: value.into_iter().map(Into::into).collect(),
        }
    }
}
