use std::sync::Arc;

use uuid::Uuid;

use crate::dto::interview_dto::{CreateInterviewPayload, InterviewListQuery, UpdateInterviewPayload};
use crate::error::{Error, Result};
use crate::models::interview::{Interview, InterviewChanges, InterviewFilter, NewInterview};
use crate::policy::lifecycle;
use crate::repository::Store;
use crate::services::application_service::ApplicationService;
use crate::utils::validation::{non_blank, validate};

const DEFAULT_DURATION_MINUTES: i32 = 60;

#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn Store>,
    applications: ApplicationService,
}

impl InterviewService {
    pub fn new(store: Arc<dyn Store>, applications: ApplicationService) -> Self {
        Self {
            store,
            applications,
        }
    }

    /// Schedules an interview and moves the application to INTERVIEW.
    pub async fn create(&self, payload: CreateInterviewPayload) -> Result<Interview> {
        validate(&payload)?;
        let application = self.applications.get_by_id(payload.application_id).await?;
        let next = lifecycle::on_interview_scheduled(application.status);
        self.applications.check_reactivation(&application, next).await?;

        let interview = self
            .store
            .insert_interview(NewInterview {
                application_id: application.id,
                job_id: application.job_id,
                interview_type: payload.interview_type,
                scheduled_at: payload.scheduled_at,
                duration_minutes: payload.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
                location: non_blank(payload.location),
                meeting_link: non_blank(payload.meeting_link),
                interviewer_id: payload.interviewer_id,
            })
            .await?;

        if let Err(err) = self.applications.transition(application, next, None).await {
            // undo the insert
            if let Err(cleanup) = self.store.delete_interview(interview.id).await {
                tracing::error!(
                    interview_id = %interview.id,
                    error = %cleanup,
                    "Failed to remove interview after status update failed"
                );
            }
            return Err(err);
        }
        tracing::info!(
            interview_id = %interview.id,
            application_id = %interview.application_id,
            "Interview scheduled"
        );
        Ok(interview)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Interview> {
        self.store
            .find_interview(id)
            .await?
            .ok_or_else(|| Error::not_found("Interview", id))
    }

    pub async fn list(&self, query: InterviewListQuery) -> Result<Vec<Interview>> {
        let filter = InterviewFilter {
            application_id: query.application_id,
            job_id: query.job_id,
            status: query.status,
        };
        self.store.list_interviews(&filter).await
    }

    pub async fn for_application(&self, application_id: Uuid) -> Result<Vec<Interview>> {
        self.applications.get_by_id(application_id).await?;
        self.list(InterviewListQuery {
            application_id: Some(application_id),
            ..Default::default()
        })
        .await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateInterviewPayload) -> Result<Interview> {
        validate(&payload)?;
        let current = self.get_by_id(id).await?;
        let status_changed = payload.status.filter(|s| *s != current.status);

        let interview = self
            .store
            .update_interview(
                id,
                InterviewChanges {
                    interview_type: payload.interview_type,
                    scheduled_at: payload.scheduled_at,
                    duration_minutes: payload.duration_minutes,
                    location: payload.location,
                    meeting_link: payload.meeting_link,
                    interviewer_id: payload.interviewer_id,
                    status: payload.status,
                    rating: payload.rating,
                    recommendation: payload.recommendation,
                    feedback: payload.feedback,
                },
            )
            .await?;

        if let Some(status) = status_changed {
            let others = self
                .store
                .count_active_interviews(interview.application_id, interview.id)
                .await?;
            let application = self.applications.get_by_id(interview.application_id).await?;
            if let Some(next) =
                lifecycle::on_interview_status_changed(application.status, status, others)
            {
                self.applications.transition(application, next, None).await?;
            }
        }
        Ok(interview)
    }

    /// Removes the interview with its assessment; the application falls back
    /// to REVIEWED when this was its last interview.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let interview = self.get_by_id(id).await?;
        let remaining = self.store.count_interviews(interview.application_id).await? - 1;
        let fallback = match lifecycle::on_interview_removed(remaining) {
            Some(next) => {
                let application = self.store.find_application(interview.application_id).await?;
                if let Some(application) = &application {
                    self.applications.check_reactivation(application, next).await?;
                }
                application.map(|application| (application, next))
            }
            None => None,
        };

        self.store
            .delete_interview(id)
            .await?
            .ok_or_else(|| Error::not_found("Interview", id))?;
        tracing::info!(interview_id = %id, application_id = %interview.application_id, "Interview deleted");

        if let Some((application, next)) = fallback {
            self.applications.transition(application, next, None).await?;
        }
        Ok(())
    }
}
