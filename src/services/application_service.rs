use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::application_dto::{ApplicationListQuery, ApplicationSubmission, ResumeUpload};
use crate::error::{field_error, Error, Result};
use crate::middleware::auth::Session;
use crate::models::account::Role;
use crate::models::application::{Application, ApplicationFilter, ApplicationStatus, NewApplication};
use crate::policy::access::Capability;
use crate::policy::lifecycle::{check_withdrawal, TransitionPolicy};
use crate::repository::Store;
use crate::services::notification_service::NotificationService;
use crate::services::upload_service::{StoredFile, UploadService};
use crate::utils::validation::{non_blank, normalize_email, validate};

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
    notifications: NotificationService,
    uploads: UploadService,
    transitions: TransitionPolicy,
}

pub fn parse_status(raw: &str) -> Result<ApplicationStatus> {
    raw.parse::<ApplicationStatus>()
        .map_err(|msg| field_error("status", "invalid_status", msg))
}

impl ApplicationService {
    pub fn new(
        store: Arc<dyn Store>,
        notifications: NotificationService,
        uploads: UploadService,
        transitions: TransitionPolicy,
    ) -> Self {
        Self {
            store,
            notifications,
            uploads,
            transitions,
        }
    }

    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
        resume: Option<ResumeUpload>,
    ) -> Result<Application> {
        validate(&submission)?;
        let job_id = submission
            .job_id
            .ok_or_else(|| field_error("job_id", "required", "Job selection is required"))?;
        let email = normalize_email(&submission.candidate_email);

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::not_found("Job", job_id))?;
        if !job.accepts_applications(Utc::now()) {
            return Err(Error::InvalidOperation(
                "This job is no longer accepting applications".to_string(),
            ));
        }

        if let Some(existing) = self.store.find_active_application(job_id, &email).await? {
            return Err(Error::conflict(
                "You have already applied for this job",
                existing.id,
            ));
        }

        let resume_path = match &resume {
            Some(upload) => Some(self.uploads.save_resume(&upload.filename, &upload.data).await?),
            None => None,
        };

        let inserted = self
            .store
            .insert_application(NewApplication {
                job_id,
                candidate_name: submission.candidate_name.trim().to_string(),
                candidate_email: email,
                candidate_phone: non_blank(submission.candidate_phone),
                cover_letter: submission.cover_letter,
                resume_path: resume_path.clone(),
            })
            .await;

        let application = match inserted {
            Ok(application) => application,
            Err(err) => {
                if let Some(path) = &resume_path {
                    self.uploads.discard(path).await;
                }
                return Err(err);
            }
        };

        tracing::info!(
            application_id = %application.id,
            job_id = %job_id,
            "Application submitted"
        );
        self.notifications
            .application_status_changed(&application)
            .await;
        Ok(application)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Application> {
        self.store
            .find_application(id)
            .await?
            .ok_or_else(|| Error::not_found("Application", id))
    }

    pub async fn list(&self, query: ApplicationListQuery) -> Result<Vec<Application>> {
        let status = match non_blank(query.status) {
            Some(raw) => Some(parse_status(&raw)?),
            None => None,
        };
        let filter = ApplicationFilter {
            job_id: query.job_id,
            status,
            candidate_email: non_blank(query.email).map(|e| normalize_email(&e)),
        };
        self.store.list_applications(&filter).await
    }

    /// Manual status change, subject to the configured transition policy.
    pub async fn update_status(
        &self,
        id: Uuid,
        raw_status: &str,
        notes: Option<String>,
    ) -> Result<Application> {
        let status = parse_status(raw_status)?;
        let current = self.get_by_id(id).await?;
        self.transitions.check(current.status, status)?;
        self.transition(current, status, non_blank(notes)).await
    }

    /// Writes `status` and notifies the candidate. A no-op when the status is
    /// unchanged and there are no notes.
    pub(crate) async fn transition(
        &self,
        current: Application,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        if current.status == status && notes.is_none() {
            return Ok(current);
        }
        let previous = current.status;
        let updated = self
            .store
            .set_application_status(current.id, status, notes)
            .await?;

        if previous != updated.status {
            tracing::info!(
                application_id = %updated.id,
                from = %previous,
                to = %updated.status,
                "Application status changed"
            );
            self.notifications.application_status_changed(&updated).await;
        }
        Ok(updated)
    }

    /// A withdrawn application can only re-enter the pipeline while no newer
    /// application for the same job and email is active.
    pub(crate) async fn check_reactivation(
        &self,
        application: &Application,
        next: ApplicationStatus,
    ) -> Result<()> {
        if application.status != ApplicationStatus::Withdrawn || next == ApplicationStatus::Withdrawn {
            return Ok(());
        }
        match self
            .store
            .find_active_application(application.job_id, &application.candidate_email)
            .await?
        {
            Some(active) if active.id != application.id => Err(Error::conflict(
                "The candidate has a newer active application for this job",
                active.id,
            )),
            _ => Ok(()),
        }
    }

    pub async fn resume(&self, id: Uuid) -> Result<StoredFile> {
        let application = self.get_by_id(id).await?;
        let path = application
            .resume_path
            .ok_or_else(|| Error::NotFound("Application has no resume".to_string()))?;
        self.uploads.read(&path).await
    }

    /// Candidates see only their own email; staff may look up any email.
    pub async fn list_for_candidate(
        &self,
        session: &Session,
        email: Option<String>,
    ) -> Result<Vec<Application>> {
        let email = non_blank(email);
        let email = if session.role == Role::Candidate {
            session.require(Capability::ViewOwnApplications)?;
            let email = email.unwrap_or_else(|| session.email.clone());
            if !session.owns_email(&email) {
                return Err(Error::Forbidden(
                    "Candidates may only view their own applications".to_string(),
                ));
            }
            email
        } else {
            session.require(Capability::ViewRecruitment)?;
            email.ok_or_else(|| field_error("email", "required", "email query parameter is required"))?
        };

        let filter = ApplicationFilter {
            candidate_email: Some(normalize_email(&email)),
            ..Default::default()
        };
        self.store.list_applications(&filter).await
    }

    pub async fn withdraw(&self, session: &Session, id: Uuid) -> Result<Application> {
        session.require(Capability::WithdrawOwnApplication)?;
        let application = self.get_by_id(id).await?;
        if !session.owns_email(&application.candidate_email) {
            return Err(Error::Forbidden(
                "You can only withdraw your own applications".to_string(),
            ));
        }
        check_withdrawal(application.status)?;
        self.transition(application, ApplicationStatus::Withdrawn, None)
            .await
    }
}
