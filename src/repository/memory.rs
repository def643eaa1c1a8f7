use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    AccountRepository, ApplicationRepository, AssessmentRepository, EmployeeRepository,
    InterviewRepository, JobRepository, OfferRepository, Page,
};
use crate::error::{Error, Result};
use crate::models::{
    account::{Account, NewAccount, Role},
    application::{Application, ApplicationFilter, ApplicationStatus, NewApplication},
    assessment::{Assessment, AssessmentChanges, NewAssessment},
    employee::{
        EmployeeChanges, EmployeeFilter, EmployeeProfile, EmployeeRecord, EmployeeStatus,
        NewEmployeeProfile,
    },
    interview::{Interview, InterviewChanges, InterviewFilter, InterviewStatus, NewInterview},
    job::{JobChanges, JobFilter, JobPosting, NewJob},
    offer::{NewOffer, Offer, OfferAcceptance, OfferFilter, OfferStatus},
};
use crate::policy::lifecycle;

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    employees: HashMap<Uuid, EmployeeProfile>,
    jobs: HashMap<Uuid, JobPosting>,
    applications: HashMap<Uuid, Application>,
    interviews: HashMap<Uuid, Interview>,
    assessments: HashMap<Uuid, Assessment>,
    offers: HashMap<Uuid, Offer>,
}

impl Tables {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
    }

    fn active_application(&self, job_id: Uuid, email: &str, except: Option<Uuid>) -> Option<&Application> {
        self.applications.values().find(|app| {
            app.job_id == job_id
                && app.candidate_email.eq_ignore_ascii_case(email)
                && app.status != ApplicationStatus::Withdrawn
                && Some(app.id) != except
        })
    }

    fn employee_record(&self, profile: &EmployeeProfile) -> Result<EmployeeRecord> {
        let account = self.accounts.get(&profile.account_id).ok_or_else(|| {
            Error::Internal(format!("employee {} has no account", profile.id))
        })?;
        Ok(EmployeeRecord {
            profile: profile.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            is_active: account.is_active,
        })
    }

    fn upsert_profile(&mut self, account_id: Uuid, profile: NewEmployeeProfile, now: DateTime<Utc>) -> EmployeeProfile {
        if let Some(existing) = self
            .employees
            .values_mut()
            .find(|existing| existing.account_id == account_id)
        {
            existing.department = profile.department;
            existing.position = profile.position;
            existing.hire_date = profile.hire_date;
            existing.salary = profile.salary;
            existing.status = EmployeeStatus::Active;
            existing.updated_at = now;
            return existing.clone();
        }
        let created = EmployeeProfile {
            id: Uuid::new_v4(),
            account_id,
            department: profile.department,
            position: profile.position,
            hire_date: profile.hire_date,
            salary: profile.salary,
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.employees.insert(created.id, created.clone());
        created
    }
}

/// Process-local store with the same invariants as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account> {
        let mut tables = self.tables()?;
        if let Some(existing) = tables.account_by_email(&account.email) {
            return Err(Error::conflict("An account with this email already exists", existing.id));
        }
        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            email: account.email,
            password_hash: account.password_hash,
            full_name: account.full_name,
            role: account.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.tables()?.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.tables()?.account_by_email(email).cloned())
    }

    async fn set_account_active(&self, id: Uuid, active: bool) -> Result<Account> {
        let mut tables = self.tables()?;
        let account = tables
            .accounts
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Account", id))?;
        account.is_active = active;
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn count_accounts_with_role(&self, role: Role) -> Result<i64> {
        let tables = self.tables()?;
        Ok(tables.accounts.values().filter(|a| a.role == role).count() as i64)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn provision_employee(
        &self,
        account: NewAccount,
        profile: NewEmployeeProfile,
    ) -> Result<EmployeeRecord> {
        let mut tables = self.tables()?;
        if let Some(existing) = tables.account_by_email(&account.email) {
            return Err(Error::conflict("An account with this email already exists", existing.id));
        }
        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            email: account.email,
            password_hash: account.password_hash,
            full_name: account.full_name,
            role: account.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let account_id = created.id;
        tables.accounts.insert(account_id, created);
        let profile = tables.upsert_profile(account_id, profile, now);
        tables.employee_record(&profile)
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<EmployeeRecord>> {
        let tables = self.tables()?;
        tables
            .employees
            .get(&id)
            .map(|profile| tables.employee_record(profile))
            .transpose()
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<EmployeeRecord>> {
        let tables = self.tables()?;
        let mut records = tables
            .employees
            .values()
            .filter(|e| {
                filter
                    .department
                    .as_deref()
                    .map_or(true, |d| e.department.eq_ignore_ascii_case(d))
            })
            .filter(|e| filter.status.map_or(true, |s| e.status == s))
            .map(|profile| tables.employee_record(profile))
            .collect::<Result<Vec<_>>>()?;
        records.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(records)
    }

    async fn update_employee(&self, id: Uuid, changes: EmployeeChanges) -> Result<EmployeeRecord> {
        let mut tables = self.tables()?;
        let profile = tables
            .employees
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Employee", id))?;
        if let Some(department) = changes.department {
            profile.department = department;
        }
        if let Some(position) = changes.position {
            profile.position = position;
        }
        if let Some(salary) = changes.salary {
            profile.salary = Some(salary);
        }
        if let Some(status) = changes.status {
            profile.status = status;
        }
        profile.updated_at = Utc::now();
        let profile = profile.clone();
        tables.employee_record(&profile)
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> Result<JobPosting> {
        let now = Utc::now();
        let created = JobPosting {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            department: job.department,
            location: job.location,
            employment_type: job.employment_type,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            requirements: job.requirements,
            benefits: job.benefits,
            status: job.status,
            posted_by: job.posted_by,
            posted_at: now,
            closing_date: job.closing_date,
            created_at: now,
            updated_at: now,
        };
        self.tables()?.jobs.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
        Ok(self.tables()?.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self, filter: &JobFilter, page: Page) -> Result<(Vec<JobPosting>, i64)> {
        let tables = self.tables()?;
        let mut matching: Vec<JobPosting> = tables
            .jobs
            .values()
            .filter(|job| filter.status.map_or(true, |s| job.status == s))
            .filter(|job| {
                filter
                    .department
                    .as_deref()
                    .map_or(true, |d| job.department.eq_ignore_ascii_case(d))
            })
            .filter(|job| {
                filter.search.as_deref().map_or(true, |q| {
                    contains_ci(&job.title, q)
                        || contains_ci(&job.location, q)
                        || contains_ci(&job.description, q)
                })
            })
            .cloned()
            .collect();
        newest_first(&mut matching, |job| job.posted_at);
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.per_page as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_open_jobs(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<JobPosting>> {
        let tables = self.tables()?;
        let mut open: Vec<JobPosting> = tables
            .jobs
            .values()
            .filter(|job| job.accepts_applications(now))
            .cloned()
            .collect();
        newest_first(&mut open, |job| job.posted_at);
        open.truncate(limit.max(0) as usize);
        Ok(open)
    }

    async fn update_job(&self, id: Uuid, changes: JobChanges) -> Result<JobPosting> {
        let mut tables = self.tables()?;
        let job = tables
            .jobs
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Job", id))?;
        if let Some(title) = changes.title {
            job.title = title;
        }
        if let Some(description) = changes.description {
            job.description = description;
        }
        if let Some(department) = changes.department {
            job.department = department;
        }
        if let Some(location) = changes.location {
            job.location = location;
        }
        if let Some(employment_type) = changes.employment_type {
            job.employment_type = employment_type;
        }
        if changes.salary_min.is_some() {
            job.salary_min = changes.salary_min;
        }
        if changes.salary_max.is_some() {
            job.salary_max = changes.salary_max;
        }
        if changes.requirements.is_some() {
            job.requirements = changes.requirements;
        }
        if changes.benefits.is_some() {
            job.benefits = changes.benefits;
        }
        if let Some(status) = changes.status {
            job.status = status;
        }
        if changes.closing_date.is_some() {
            job.closing_date = changes.closing_date;
        }
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables()?.jobs.remove(&id).is_some())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn insert_application(&self, application: NewApplication) -> Result<Application> {
        let mut tables = self.tables()?;
        if let Some(existing) =
            tables.active_application(application.job_id, &application.candidate_email, None)
        {
            return Err(Error::conflict(
                "You have already applied for this job",
                existing.id,
            ));
        }
        let now = Utc::now();
        let created = Application {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            candidate_name: application.candidate_name,
            candidate_email: application.candidate_email,
            candidate_phone: application.candidate_phone,
            cover_letter: application.cover_letter,
            resume_path: application.resume_path,
            status: ApplicationStatus::Submitted,
            notes: None,
            applied_at: now,
            updated_at: now,
        };
        tables.applications.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.tables()?.applications.get(&id).cloned())
    }

    async fn find_active_application(&self, job_id: Uuid, email: &str) -> Result<Option<Application>> {
        Ok(self.tables()?.active_application(job_id, email, None).cloned())
    }

    async fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let tables = self.tables()?;
        let mut items: Vec<Application> = tables
            .applications
            .values()
            .filter(|app| filter.job_id.map_or(true, |job| app.job_id == job))
            .filter(|app| filter.status.map_or(true, |s| app.status == s))
            .filter(|app| {
                filter
                    .candidate_email
                    .as_deref()
                    .map_or(true, |email| app.candidate_email.eq_ignore_ascii_case(email))
            })
            .cloned()
            .collect();
        newest_first(&mut items, |app| app.applied_at);
        Ok(items)
    }

    async fn count_applications_for_job(&self, job_id: Uuid) -> Result<i64> {
        let tables = self.tables()?;
        Ok(tables
            .applications
            .values()
            .filter(|app| app.job_id == job_id)
            .count() as i64)
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let mut tables = self.tables()?;
        let current = tables
            .applications
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Application", id))?;
        if current.status == ApplicationStatus::Withdrawn && status != ApplicationStatus::Withdrawn {
            if let Some(other) =
                tables.active_application(current.job_id, &current.candidate_email, Some(id))
            {
                return Err(Error::conflict(
                    "Candidate already has an active application for this job",
                    other.id,
                ));
            }
        }
        let app = tables
            .applications
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Application", id))?;
        app.status = status;
        if notes.is_some() {
            app.notes = notes;
        }
        app.updated_at = Utc::now();
        Ok(app.clone())
    }
}

#[async_trait]
impl InterviewRepository for MemoryStore {
    async fn insert_interview(&self, interview: NewInterview) -> Result<Interview> {
        let now = Utc::now();
        let created = Interview {
            id: Uuid::new_v4(),
            application_id: interview.application_id,
            job_id: interview.job_id,
            interview_type: interview.interview_type,
            scheduled_at: interview.scheduled_at,
            duration_minutes: interview.duration_minutes,
            location: interview.location,
            meeting_link: interview.meeting_link,
            interviewer_id: interview.interviewer_id,
            status: InterviewStatus::Scheduled,
            rating: None,
            recommendation: None,
            feedback: None,
            created_at: now,
            updated_at: now,
        };
        self.tables()?.interviews.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        Ok(self.tables()?.interviews.get(&id).cloned())
    }

    async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let tables = self.tables()?;
        let mut items: Vec<Interview> = tables
            .interviews
            .values()
            .filter(|i| filter.application_id.map_or(true, |a| i.application_id == a))
            .filter(|i| filter.job_id.map_or(true, |j| i.job_id == j))
            .filter(|i| filter.status.map_or(true, |s| i.status == s))
            .cloned()
            .collect();
        items.sort_by_key(|i| i.scheduled_at);
        Ok(items)
    }

    async fn update_interview(&self, id: Uuid, changes: InterviewChanges) -> Result<Interview> {
        let mut tables = self.tables()?;
        let interview = tables
            .interviews
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Interview", id))?;
        if let Some(kind) = changes.interview_type {
            interview.interview_type = kind;
        }
        if let Some(at) = changes.scheduled_at {
            interview.scheduled_at = at;
        }
        if let Some(minutes) = changes.duration_minutes {
            interview.duration_minutes = minutes;
        }
        if changes.location.is_some() {
            interview.location = changes.location;
        }
        if changes.meeting_link.is_some() {
            interview.meeting_link = changes.meeting_link;
        }
        if changes.interviewer_id.is_some() {
            interview.interviewer_id = changes.interviewer_id;
        }
        if let Some(status) = changes.status {
            interview.status = status;
        }
        if changes.rating.is_some() {
            interview.rating = changes.rating;
        }
        if changes.recommendation.is_some() {
            interview.recommendation = changes.recommendation;
        }
        if changes.feedback.is_some() {
            interview.feedback = changes.feedback;
        }
        interview.updated_at = Utc::now();
        Ok(interview.clone())
    }

    async fn delete_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let mut tables = self.tables()?;
        let removed = tables.interviews.remove(&id);
        if removed.is_some() {
            tables.assessments.retain(|_, a| a.interview_id != id);
        }
        Ok(removed)
    }

    async fn count_interviews(&self, application_id: Uuid) -> Result<i64> {
        let tables = self.tables()?;
        Ok(tables
            .interviews
            .values()
            .filter(|i| i.application_id == application_id)
            .count() as i64)
    }

    async fn count_active_interviews(&self, application_id: Uuid, excluding: Uuid) -> Result<i64> {
        let tables = self.tables()?;
        Ok(tables
            .interviews
            .values()
            .filter(|i| i.application_id == application_id && i.id != excluding && i.status.is_active())
            .count() as i64)
    }
}

#[async_trait]
impl AssessmentRepository for MemoryStore {
    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<Assessment> {
        let mut tables = self.tables()?;
        if let Some(existing) = tables
            .assessments
            .values()
            .find(|a| a.interview_id == assessment.interview_id)
        {
            return Err(Error::conflict(
                "An assessment already exists for this interview",
                existing.id,
            ));
        }
        let now = Utc::now();
        let created = Assessment {
            id: Uuid::new_v4(),
            interview_id: assessment.interview_id,
            technical_skills: assessment.technical_skills,
            communication: assessment.communication,
            problem_solving: assessment.problem_solving,
            cultural_fit: assessment.cultural_fit,
            overall_rating: assessment.overall_rating,
            strengths: assessment.strengths,
            weaknesses: assessment.weaknesses,
            comments: assessment.comments,
            recommendation: assessment.recommendation,
            assessed_by: assessment.assessed_by,
            created_at: now,
            updated_at: now,
        };
        tables.assessments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_assessment(&self, id: Uuid) -> Result<Option<Assessment>> {
        Ok(self.tables()?.assessments.get(&id).cloned())
    }

    async fn find_assessment_for_interview(&self, interview_id: Uuid) -> Result<Option<Assessment>> {
        let tables = self.tables()?;
        Ok(tables
            .assessments
            .values()
            .find(|a| a.interview_id == interview_id)
            .cloned())
    }

    async fn update_assessment(&self, id: Uuid, changes: AssessmentChanges) -> Result<Assessment> {
        let mut tables = self.tables()?;
        let assessment = tables
            .assessments
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Assessment", id))?;
        if let Some(v) = changes.technical_skills {
            assessment.technical_skills = v;
        }
        if let Some(v) = changes.communication {
            assessment.communication = v;
        }
        if let Some(v) = changes.problem_solving {
            assessment.problem_solving = v;
        }
        if let Some(v) = changes.cultural_fit {
            assessment.cultural_fit = v;
        }
        if let Some(v) = changes.overall_rating {
            assessment.overall_rating = v;
        }
        if changes.strengths.is_some() {
            assessment.strengths = changes.strengths;
        }
        if changes.weaknesses.is_some() {
            assessment.weaknesses = changes.weaknesses;
        }
        if changes.comments.is_some() {
            assessment.comments = changes.comments;
        }
        if let Some(r) = changes.recommendation {
            assessment.recommendation = r;
        }
        assessment.updated_at = Utc::now();
        Ok(assessment.clone())
    }
}

#[async_trait]
impl OfferRepository for MemoryStore {
    async fn insert_offer(&self, offer: NewOffer) -> Result<Offer> {
        let now = Utc::now();
        let created = Offer {
            id: Uuid::new_v4(),
            application_id: offer.application_id,
            candidate_email: offer.candidate_email,
            position_title: offer.position_title,
            department: offer.department,
            salary: offer.salary,
            currency: offer.currency,
            start_date: offer.start_date,
            expires_at: offer.expires_at,
            benefits: offer.benefits,
            notes: offer.notes,
            status: OfferStatus::Pending,
            created_by: offer.created_by,
            responded_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tables()?.offers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>> {
        Ok(self.tables()?.offers.get(&id).cloned())
    }

    async fn find_open_offer_for_application(&self, application_id: Uuid) -> Result<Option<Offer>> {
        let tables = self.tables()?;
        Ok(tables
            .offers
            .values()
            .find(|o| o.application_id == application_id && o.status != OfferStatus::Rejected)
            .cloned())
    }

    async fn list_offers(&self, filter: &OfferFilter) -> Result<Vec<Offer>> {
        let tables = self.tables()?;
        let mut items: Vec<Offer> = tables
            .offers
            .values()
            .filter(|o| filter.application_id.map_or(true, |a| o.application_id == a))
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| {
                filter
                    .candidate_email
                    .as_deref()
                    .map_or(true, |email| o.candidate_email.eq_ignore_ascii_case(email))
            })
            .cloned()
            .collect();
        newest_first(&mut items, |o| o.created_at);
        Ok(items)
    }

    async fn set_offer_status(&self, id: Uuid, status: OfferStatus) -> Result<Offer> {
        let mut tables = self.tables()?;
        let offer = tables
            .offers
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Offer", id))?;
        let now = Utc::now();
        offer.status = status;
        if matches!(status, OfferStatus::Accepted | OfferStatus::Rejected) {
            offer.responded_at = Some(now);
        }
        offer.updated_at = now;
        Ok(offer.clone())
    }

    async fn accept_offer(
        &self,
        offer_id: Uuid,
        account_id: Uuid,
        profile: NewEmployeeProfile,
    ) -> Result<OfferAcceptance> {
        let mut tables = self.tables()?;
        let now = Utc::now();

        // all checks before the first write
        let offer = tables
            .offers
            .get(&offer_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Offer", offer_id))?;
        if !offer.status.awaits_response() {
            return Err(Error::InvalidOperation(format!(
                "offer is already {:?}",
                offer.status
            )));
        }
        if !tables.applications.contains_key(&offer.application_id) {
            return Err(Error::not_found("Application", offer.application_id));
        }
        if !tables.accounts.contains_key(&account_id) {
            return Err(Error::not_found("Account", account_id));
        }

        let offer = {
            let stored = tables
                .offers
                .get_mut(&offer_id)
                .ok_or_else(|| Error::not_found("Offer", offer_id))?;
            stored.status = OfferStatus::Accepted;
            stored.responded_at = Some(now);
            stored.updated_at = now;
            stored.clone()
        };
        let application = {
            let stored = tables
                .applications
                .get_mut(&offer.application_id)
                .ok_or_else(|| Error::not_found("Application", offer.application_id))?;
            stored.status = lifecycle::on_offer_accepted();
            stored.updated_at = now;
            stored.clone()
        };
        if let Some(account) = tables.accounts.get_mut(&account_id) {
            if account.role == Role::Candidate {
                account.role = Role::Employee;
            }
            account.updated_at = now;
        }
        let employee = tables.upsert_profile(account_id, profile, now);

        Ok(OfferAcceptance {
            offer,
            application,
            employee,
        })
    }
}
