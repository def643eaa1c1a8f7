use std::sync::Arc;

use uuid::Uuid;

use crate::dto::assessment_dto::{CreateAssessmentPayload, UpdateAssessmentPayload};
use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, NewAssessment};
use crate::repository::Store;
use crate::utils::validation::{non_blank, validate};

#[derive(Clone)]
pub struct AssessmentService {
    store: Arc<dyn Store>,
}

impl AssessmentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// One assessment per interview; a second attempt is a conflict carrying the first id.
    pub async fn create(&self, assessed_by: Uuid, payload: CreateAssessmentPayload) -> Result<Assessment> {
        validate(&payload)?;
        let interview = self
            .store
            .find_interview(payload.interview_id)
            .await?
            .ok_or_else(|| Error::not_found("Interview", payload.interview_id))?;

        if let Some(existing) = self.store.find_assessment_for_interview(interview.id).await? {
            return Err(Error::conflict(
                "An assessment already exists for this interview",
                existing.id,
            ));
        }

        let assessment = self
            .store
            .insert_assessment(NewAssessment {
                interview_id: interview.id,
                technical_skills: payload.technical_skills,
                communication: payload.communication,
                problem_solving: payload.problem_solving,
                cultural_fit: payload.cultural_fit,
                overall_rating: payload.overall_rating,
                strengths: non_blank(payload.strengths),
                weaknesses: non_blank(payload.weaknesses),
                comments: non_blank(payload.comments),
                recommendation: payload.recommendation,
                assessed_by: Some(assessed_by),
            })
            .await?;
        tracing::info!(
            assessment_id = %assessment.id,
            interview_id = %interview.id,
            overall = assessment.overall_rating,
            "Assessment recorded"
        );
        Ok(assessment)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Assessment> {
        self.store
            .find_assessment(id)
            .await?
            .ok_or_else(|| Error::not_found("Assessment", id))
    }

    pub async fn for_interview(&self, interview_id: Uuid) -> Result<Assessment> {
        self.store
            .find_assessment_for_interview(interview_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("No assessment recorded for interview {}", interview_id))
            })
    }

    pub async fn update(&self, id: Uuid, payload: UpdateAssessmentPayload) -> Result<Assessment> {
        validate(&payload)?;
        self.store.update_assessment(id, payload.into()).await
    }
}
