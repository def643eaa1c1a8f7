use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hiring_recommendation", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongHire,
    Hire,
    Maybe,
    NoHire,
    StrongNoHire,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assessment {
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

#[derive(Debug, Clone)]
pub struct NewAssessment {
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
}

#[derive(Debug, Clone, Default)]
pub struct AssessmentChanges {
    pub technical_skills: Option<i32>,
    pub communication: Option<i32>,
    pub problem_solving: Option<i32>,
    pub cultural_fit: Option<i32>,
    pub overall_rating: Option<i32>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments: Option<String>,
    pub recommendation: Option<Recommendation>,
}
