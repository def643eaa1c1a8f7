use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::assessment::{Assessment, AssessmentChanges, Recommendation};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAssessmentPayload {
    pub interview_id: Uuid,
    #[validate(range(min = 1, max = 10))]
    pub technical_skills: i32,
    #[validate(range(min = 1, max = 10))]
    pub communication: i32,
    #[validate(range(min = 1, max = 10))]
    pub problem_solving: i32,
    #[validate(range(min = 1, max = 10))]
    pub cultural_fit: i32,
    #[validate(range(min = 1, max = 10))]
    pub overall_rating: i32,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments: Option<String>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateAssessmentPayload {
    #[validate(range(min = 1, max = 10))]
    pub technical_skills: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub communication: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub problem_solving: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub cultural_fit: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub overall_rating: Option<i32>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments: Option<String>,
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub technical_skills: i32,
    pub communication: i32,
    pub problem_solving: i32,
    pub cultural_fit: i32,
    pub overall_rating: i32,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments: Option<String>,
    pub recommendation: Recommendation,
    pub assessed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Assessment> for AssessmentResponse {
    fn from(value: Assessment) -> Self {
        Self {
            id: value.id,
            interview_id: value.interview_id,
            technical_skills: value.technical_skills,
            communication: value.communication,
            problem_solving: value.problem_solving,
            cultural_fit: value.cultural_fit,
            overall_rating: value.overall_rating,
            strengths: value.strengths,
            weaknesses: value.weaknesses,
            comments: value.comments,
            recommendation: value.recommendation,
            assessed_by: value.assessed_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<UpdateAssessmentPayload> for AssessmentChanges {
    fn from(value: UpdateAssessmentPayload) -> Self {
        Self {
            technical_skills: value.technical_skills,
            communication: value.communication,
            problem_solving: value.problem_solving,
            cultural_fit: value.cultural_fit,
            overall_rating: value.overall_rating,
            strengths: value.strengths,
            weaknesses: value.weaknesses,
            comments: value.comments,
            recommendation: value.recommendation,
        }
    }
}
