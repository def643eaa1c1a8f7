//! Persistence seams.
//!
//! Services talk to storage only through these traits. [`PgStore`] is the
//! production implementation; [`MemoryStore`] backs tests and local runs.
//! Both enforce the same uniqueness rules at write time, so the
//! check-then-insert guards in the services are only there to give a
//! friendlier error.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    account::{Account, NewAccount, Role},
    application::{Application, ApplicationFilter, ApplicationStatus, NewApplication},
    assessment::{Assessment, AssessmentChanges, NewAssessment},
    employee::{EmployeeChanges, EmployeeFilter, EmployeeRecord, NewEmployeeProfile},
    interview::{Interview, InterviewChanges, InterviewFilter, NewInterview},
    job::{JobChanges, JobFilter, JobPosting, NewJob},
    offer::{NewOffer, Offer, OfferAcceptance, OfferFilter, OfferStatus},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(20).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.per_page - 1) / self.per_page
    }
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn insert_account(&self, account: NewAccount) -> Result<Account>;
    async fn find_account(&self, id: Uuid) -> Result<Option<Account>>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn set_account_active(&self, id: Uuid, active: bool) -> Result<Account>;
    async fn count_accounts_with_role(&self, role: Role) -> Result<i64>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Creates the account and its employee profile in one transaction.
    async fn provision_employee(
        &self,
        account: NewAccount,
        profile: NewEmployeeProfile,
    ) -> Result<EmployeeRecord>;
    async fn find_employee(&self, id: Uuid) -> Result<Option<EmployeeRecord>>;
    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<EmployeeRecord>>;
    async fn update_employee(&self, id: Uuid, changes: EmployeeChanges) -> Result<EmployeeRecord>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> Result<JobPosting>;
    async fn find_job(&self, id: Uuid) -> Result<Option<JobPosting>>;
    async fn list_jobs(&self, filter: &JobFilter, page: Page) -> Result<(Vec<JobPosting>, i64)>;
    /// Open jobs whose closing date, if any, is after `now`.
    async fn list_open_jobs(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<JobPosting>>;
    async fn update_job(&self, id: Uuid, changes: JobChanges) -> Result<JobPosting>;
    async fn delete_job(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `Conflict` carrying the existing id when a non-withdrawn
    /// application for the same job and email exists.
    async fn insert_application(&self, application: NewApplication) -> Result<Application>;
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_active_application(&self, job_id: Uuid, email: &str) -> Result<Option<Application>>;
    async fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>>;
    async fn count_applications_for_job(&self, job_id: Uuid) -> Result<i64>;
    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application>;
}

#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn insert_interview(&self, interview: NewInterview) -> Result<Interview>;
    async fn find_interview(&self, id: Uuid) -> Result<Option<Interview>>;
    async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>>;
    async fn update_interview(&self, id: Uuid, changes: InterviewChanges) -> Result<Interview>;
    /// Removes the interview and its assessment.
    async fn delete_interview(&self, id: Uuid) -> Result<Option<Interview>>;
    async fn count_interviews(&self, application_id: Uuid) -> Result<i64>;
    async fn count_active_interviews(&self, application_id: Uuid, excluding: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Fails with `Conflict` carrying the existing id when the interview is already assessed.
    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<Assessment>;
    async fn find_assessment(&self, id: Uuid) -> Result<Option<Assessment>>;
    async fn find_assessment_for_interview(&self, interview_id: Uuid) -> Result<Option<Assessment>>;
    async fn update_assessment(&self, id: Uuid, changes: AssessmentChanges) -> Result<Assessment>;
}

#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn insert_offer(&self, offer: NewOffer) -> Result<Offer>;
    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>>;
    /// A pending, sent or accepted offer for the application.
    async fn find_open_offer_for_application(&self, application_id: Uuid) -> Result<Option<Offer>>;
    async fn list_offers(&self, filter: &OfferFilter) -> Result<Vec<Offer>>;
    async fn set_offer_status(&self, id: Uuid, status: OfferStatus) -> Result<Offer>;
    /// In one transaction: offer accepted, application hired, the account
    /// promoted to employee and its profile provisioned.
    async fn accept_offer(
        &self,
        offer_id: Uuid,
        account_id: Uuid,
        profile: NewEmployeeProfile,
    ) -> Result<OfferAcceptance>;
}

pub trait Store:
    AccountRepository
    + EmployeeRepository
    + JobRepository
    + ApplicationRepository
    + InterviewRepository
    + AssessmentRepository
    + OfferRepository
{
}

impl<T> Store for T where
    T: AccountRepository
        + EmployeeRepository
        + JobRepository
        + ApplicationRepository
        + InterviewRepository
        + AssessmentRepository
        + OfferRepository
{
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_is_clamped_and_paged() {
        let page = Page::new(Some(0), Some(500));
        assert_eq!(page, Page { page: 1, per_page: 100 });
        let page = Page::new(Some(3), Some(10));
        assert_eq!(page.offset(), 20);
        assert_eq!(page.total_pages(21), 3);
        assert_eq!(page.total_pages(0), 0);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let page = Page::new(Some(i64::MAX), Some(100));
        assert_eq!(page.offset(), i64::MAX);
    }
}
