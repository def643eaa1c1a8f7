use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{field_error, Error, Result};
use crate::models::job::{JobChanges, JobFilter, JobPosting, JobStatus, NewJob};
use crate::repository::{Page, Store};
use crate::utils::validation::{non_blank, validate};

const DEFAULT_PUBLIC_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
}

pub struct JobList {
    pub items: Vec<JobPosting>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

fn check_salary_range(min: Option<Decimal>, max: Option<Decimal>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(field_error(
                "salary_min",
                "range",
                "salary_min must not exceed salary_max",
            ));
        }
    }
    Ok(())
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, posted_by: Uuid, payload: CreateJobPayload) -> Result<JobPosting> {
        validate(&payload)?;
        check_salary_range(payload.salary_min, payload.salary_max)?;

        let job = self
            .store
            .insert_job(NewJob {
                title: payload.title.trim().to_string(),
                description: payload.description,
                department: payload.department.trim().to_string(),
                location: payload.location.trim().to_string(),
                employment_type: payload.employment_type,
                salary_min: payload.salary_min,
                salary_max: payload.salary_max,
                requirements: non_blank(payload.requirements),
                benefits: non_blank(payload.benefits),
                status: payload.status.unwrap_or(JobStatus::Open),
                posted_by: Some(posted_by),
                closing_date: payload.closing_date,
            })
            .await?;
        tracing::info!(job_id = %job.id, title = %job.title, "Job posted");
        Ok(job)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobPosting> {
        self.store
            .find_job(id)
            .await?
            .ok_or_else(|| Error::not_found("Job", id))
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = Page::new(query.page, query.per_page);
        let filter = JobFilter {
            status: query.status,
            department: non_blank(query.department),
            search: non_blank(query.search),
        };
        let (items, total) = self.store.list_jobs(&filter, page).await?;
        Ok(JobList {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages(total),
        })
    }

    pub async fn update(&self, id: Uuid, payload: UpdateJobPayload) -> Result<JobPosting> {
        validate(&payload)?;
        let current = self.get_by_id(id).await?;
        check_salary_range(
            payload.salary_min.or(current.salary_min),
            payload.salary_max.or(current.salary_max),
        )?;

        let job = self
            .store
            .update_job(
                id,
                JobChanges {
                    title: payload.title.map(|t| t.trim().to_string()),
                    description: payload.description,
                    department: payload.department.map(|d| d.trim().to_string()),
                    location: payload.location.map(|l| l.trim().to_string()),
                    employment_type: payload.employment_type,
                    salary_min: payload.salary_min,
                    salary_max: payload.salary_max,
                    requirements: payload.requirements,
                    benefits: payload.benefits,
                    status: payload.status,
                    closing_date: payload.closing_date,
                },
            )
            .await?;
        Ok(job)
    }

    /// Refused once the job has applications; close it instead.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.get_by_id(id).await?;
        let applications = self.store.count_applications_for_job(id).await?;
        if applications > 0 {
            return Err(Error::InvalidOperation(format!(
                "Job has {} application(s) and cannot be deleted; close it instead",
                applications
            )));
        }
        if !self.store.delete_job(id).await? {
            return Err(Error::not_found("Job", id));
        }
        tracing::info!(job_id = %id, "Job deleted");
        Ok(())
    }

    pub async fn list_public(&self, limit: Option<i64>) -> Result<Vec<JobPosting>> {
        let limit = limit.unwrap_or(DEFAULT_PUBLIC_LIMIT).clamp(1, 100);
        self.store.list_open_jobs(Utc::now(), limit).await
    }

    pub async fn get_public(&self, id: Uuid) -> Result<JobPosting> {
        self.store
            .find_job(id)
            .await?
            .filter(|job| job.accepts_applications(Utc::now()))
            .ok_or_else(|| Error::not_found("Job", id))
    }
}
