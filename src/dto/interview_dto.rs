use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::assessment::Recommendation;
use crate::models::interview::{Interview, InterviewStatus, InterviewType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInterviewPayload {
    pub application_id: Uuid,
    pub interview_type: InterviewType,
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    pub interviewer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateInterviewPayload {
    pub interview_type: Option<InterviewType>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    pub interviewer_id: Option<Uuid>,
    pub status: Option<InterviewStatus>,
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: Option<i32>,
    pub recommendation: Option<Recommendation>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewResponse {
    pub id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub interview_type: InterviewType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub interviewer_id: Option<Uuid>,
    pub status: InterviewStatus,
    pub rating: Option<i32>,
    pub recommendation: Option<Recommendation>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InterviewListQuery {
    pub application_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub status: Option<InterviewStatus>,
}

impl From<Interview> for InterviewResponse {
    fn from(value: Interview) -> Self {
        Self {
            id: value.id,
            application_id: value.application_id,
            job_id: value.job_id,
            interview_type: value.interview_type,
            scheduled_at: value.scheduled_at,
            duration_minutes: value.duration_minutes,
            location: value.location,
            meeting_link: value.meeting_link,
            interviewer_id: value.interviewer_id,
            status: value.status,
            rating: value.rating,
            recommendation: value.recommendation,
            feedback: value.feedback,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
