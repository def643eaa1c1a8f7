use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    AccountRepository, ApplicationRepository, AssessmentRepository, EmployeeRepository,
    InterviewRepository, JobRepository, OfferRepository, Page,
};
use crate::error::{Error, Result};
use crate::policy::lifecycle;
use crate::models::{
    account::{Account, NewAccount, Role},
    application::{Application, ApplicationFilter, ApplicationStatus, NewApplication},
    assessment::{Assessment, AssessmentChanges, NewAssessment},
    employee::{
        EmployeeChanges, EmployeeFilter, EmployeeProfile, EmployeeRecord, NewEmployeeProfile,
    },
    interview::{Interview, InterviewChanges, InterviewFilter, NewInterview},
    job::{JobChanges, JobFilter, JobPosting, NewJob},
    offer::{NewOffer, Offer, OfferAcceptance, OfferFilter, OfferStatus},
};

const EMPLOYEE_RECORD_SELECT: &str = r#"
    SELECT e.id, e.account_id, e.department, e.position, e.hire_date, e.salary, e.status,
           e.created_at, e.updated_at, a.email, a.full_name, a.role, a.is_active
    FROM employee_profiles e
    JOIN accounts a ON a.id = e.account_id
"#;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_account_tx(tx: &mut Transaction<'_, Postgres>, account: NewAccount) -> Result<Account> {
        let inserted = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(account.role)
        .fetch_one(&mut **tx)
        .await;

        match inserted {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                let existing: Uuid = sqlx::query_scalar("SELECT id FROM accounts WHERE email = $1")
                    .bind(&account.email)
                    .fetch_one(&mut **tx)
                    .await?;
                Err(Error::conflict("An account with this email already exists", existing))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn upsert_profile_tx(
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
        profile: NewEmployeeProfile,
    ) -> Result<EmployeeProfile> {
        let profile = sqlx::query_as::<_, EmployeeProfile>(
            r#"
            INSERT INTO employee_profiles (account_id, department, position, hire_date, salary, status)
            VALUES ($1, $2, $3, $4, $5, 'ACTIVE')
            ON CONFLICT (account_id) DO UPDATE SET
                department = EXCLUDED.department,
                position = EXCLUDED.position,
                hire_date = EXCLUDED.hire_date,
                salary = EXCLUDED.salary,
                status = 'ACTIVE',
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(&profile.department)
        .bind(&profile.position)
        .bind(profile.hire_date)
        .bind(profile.salary)
        .fetch_one(&mut **tx)
        .await?;
        Ok(profile)
    }

    async fn active_application_id(&self, job_id: Uuid, email: &str, except: Uuid) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM applications
            WHERE job_id = $1 AND candidate_email = $2 AND status <> 'WITHDRAWN' AND id <> $3
            LIMIT 1
            "#,
        )
        .bind(job_id)
        .bind(email)
        .bind(except)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }
}

#[async_trait]
impl AccountRepository for PgStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account> {
        let mut tx = self.pool.begin().await?;
        let created = Self::insert_account_tx(&mut tx, account).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn set_account_active(&self, id: Uuid, active: bool) -> Result<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Account", id))
    }

    async fn count_accounts_with_role(&self, role: Role) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl EmployeeRepository for PgStore {
    async fn provision_employee(
        &self,
        account: NewAccount,
        profile: NewEmployeeProfile,
    ) -> Result<EmployeeRecord> {
        let mut tx = self.pool.begin().await?;
        let account = Self::insert_account_tx(&mut tx, account).await?;
        let profile = Self::upsert_profile_tx(&mut tx, account.id, profile).await?;
        tx.commit().await?;

        Ok(EmployeeRecord {
            profile,
            email: account.email,
            full_name: account.full_name,
            role: account.role,
            is_active: account.is_active,
        })
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<EmployeeRecord>> {
        let sql = format!("{} WHERE e.id = $1", EMPLOYEE_RECORD_SELECT);
        let record = sqlx::query_as::<_, EmployeeRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<EmployeeRecord>> {
        let sql = format!(
            "{} WHERE ($1::text IS NULL OR lower(e.department) = lower($1))
                AND ($2::employee_status IS NULL OR e.status = $2)
              ORDER BY a.full_name",
            EMPLOYEE_RECORD_SELECT
        );
        let records = sqlx::query_as::<_, EmployeeRecord>(&sql)
            .bind(filter.department.as_deref())
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn update_employee(&self, id: Uuid, changes: EmployeeChanges) -> Result<EmployeeRecord> {
        let updated = sqlx::query(
            r#"
            UPDATE employee_profiles
            SET
                department = COALESCE($2, department),
                position = COALESCE($3, position),
                salary = COALESCE($4, salary),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.department)
        .bind(changes.position)
        .bind(changes.salary)
        .bind(changes.status)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::not_found("Employee", id));
        }
        self.find_employee(id)
            .await?
            .ok_or_else(|| Error::not_found("Employee", id))
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn insert_job(&self, job: NewJob) -> Result<JobPosting> {
        let created = sqlx::query_as::<_, JobPosting>(
            r#"
            INSERT INTO jobs (
                title, description, department, location, employment_type,
                salary_min, salary_max, requirements, benefits, status,
                posted_by, closing_date
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12
            )
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.department)
        .bind(&job.location)
        .bind(job.employment_type)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(job.status)
        .bind(job.posted_by)
        .bind(job.closing_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
        let job = sqlx::query_as::<_, JobPosting>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn list_jobs(&self, filter: &JobFilter, page: Page) -> Result<(Vec<JobPosting>, i64)> {
        let where_clause = r#"
            WHERE ($1::job_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR lower(department) = lower($2))
              AND ($3::text IS NULL OR title ILIKE $3 OR location ILIKE $3 OR description ILIKE $3)
        "#;
        let search = filter.search.as_ref().map(|q| format!("%{}%", q));

        let items_query = format!(
            "SELECT * FROM jobs {} ORDER BY posted_at DESC LIMIT $4 OFFSET $5",
            where_clause
        );
        let items = sqlx::query_as::<_, JobPosting>(&items_query)
            .bind(filter.status)
            .bind(filter.department.as_deref())
            .bind(search.as_deref())
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total_query = format!("SELECT COUNT(*) FROM jobs {}", where_clause);
        let total = sqlx::query_scalar::<_, i64>(&total_query)
            .bind(filter.status)
            .bind(filter.department.as_deref())
            .bind(search.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn list_open_jobs(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<JobPosting>> {
        let items = sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT * FROM jobs
            WHERE status = 'OPEN' AND (closing_date IS NULL OR closing_date > $1)
            ORDER BY posted_at DESC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn update_job(&self, id: Uuid, changes: JobChanges) -> Result<JobPosting> {
        sqlx::query_as::<_, JobPosting>(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                department = COALESCE($4, department),
                location = COALESCE($5, location),
                employment_type = COALESCE($6, employment_type),
                salary_min = COALESCE($7, salary_min),
                salary_max = COALESCE($8, salary_max),
                requirements = COALESCE($9, requirements),
                benefits = COALESCE($10, benefits),
                status = COALESCE($11, status),
                closing_date = COALESCE($12, closing_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.department)
        .bind(changes.location)
        .bind(changes.employment_type)
        .bind(changes.salary_min)
        .bind(changes.salary_max)
        .bind(changes.requirements)
        .bind(changes.benefits)
        .bind(changes.status)
        .bind(changes.closing_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Job", id))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn insert_application(&self, application: NewApplication) -> Result<Application> {
        let inserted = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                job_id, candidate_name, candidate_email, candidate_phone, cover_letter, resume_path
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(application.job_id)
        .bind(&application.candidate_name)
        .bind(&application.candidate_email)
        .bind(&application.candidate_phone)
        .bind(&application.cover_letter)
        .bind(&application.resume_path)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                let existing = self
                    .find_active_application(application.job_id, &application.candidate_email)
                    .await?
                    .ok_or(Error::Database(err))?;
                Err(Error::conflict("You have already applied for this job", existing.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let app = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(app)
    }

    async fn find_active_application(&self, job_id: Uuid, email: &str) -> Result<Option<Application>> {
        let app = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE job_id = $1 AND candidate_email = $2 AND status <> 'WITHDRAWN'
            LIMIT 1
            "#,
        )
        .bind(job_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(app)
    }

    async fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let items = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE ($1::uuid IS NULL OR job_id = $1)
              AND ($2::application_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR candidate_email = lower($3))
            ORDER BY applied_at DESC
            "#,
        )
        .bind(filter.job_id)
        .bind(filter.status)
        .bind(filter.candidate_email.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn count_applications_for_job(&self, job_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application> {
        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $2, notes = COALESCE($3, notes), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await;

        match updated {
            Ok(Some(app)) => Ok(app),
            Ok(None) => Err(Error::not_found("Application", id)),
            Err(err) if is_unique_violation(&err) => {
                let current = self
                    .find_application(id)
                    .await?
                    .ok_or_else(|| Error::not_found("Application", id))?;
                let other = self
                    .active_application_id(current.job_id, &current.candidate_email, id)
                    .await?
                    .ok_or(Error::Database(err))?;
                Err(Error::conflict(
                    "Candidate already has an active application for this job",
                    other,
                ))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl InterviewRepository for PgStore {
    async fn insert_interview(&self, interview: NewInterview) -> Result<Interview> {
        let created = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (
                application_id, job_id, interview_type, scheduled_at, duration_minutes,
                location, meeting_link, interviewer_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(interview.application_id)
        .bind(interview.job_id)
        .bind(interview.interview_type)
        .bind(interview.scheduled_at)
        .bind(interview.duration_minutes)
        .bind(&interview.location)
        .bind(&interview.meeting_link)
        .bind(interview.interviewer_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let interview = sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(interview)
    }

    async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let items = sqlx::query_as::<_, Interview>(
            r#"
            SELECT * FROM interviews
            WHERE ($1::uuid IS NULL OR application_id = $1)
              AND ($2::uuid IS NULL OR job_id = $2)
              AND ($3::interview_status IS NULL OR status = $3)
            ORDER BY scheduled_at ASC
            "#,
        )
        .bind(filter.application_id)
        .bind(filter.job_id)
        .bind(filter.status)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn update_interview(&self, id: Uuid, changes: InterviewChanges) -> Result<Interview> {
        sqlx::query_as::<_, Interview>(
            r#"
            UPDATE interviews
            SET
                interview_type = COALESCE($2, interview_type),
                scheduled_at = COALESCE($3, scheduled_at),
                duration_minutes = COALESCE($4, duration_minutes),
                location = COALESCE($5, location),
                meeting_link = COALESCE($6, meeting_link),
                interviewer_id = COALESCE($7, interviewer_id),
                status = COALESCE($8, status),
                rating = COALESCE($9, rating),
                recommendation = COALESCE($10, recommendation),
                feedback = COALESCE($11, feedback),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.interview_type)
        .bind(changes.scheduled_at)
        .bind(changes.duration_minutes)
        .bind(changes.location)
        .bind(changes.meeting_link)
        .bind(changes.interviewer_id)
        .bind(changes.status)
        .bind(changes.rating)
        .bind(changes.recommendation)
        .bind(changes.feedback)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Interview", id))
    }

    async fn delete_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let removed = sqlx::query_as::<_, Interview>("DELETE FROM interviews WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(removed)
    }

    async fn count_interviews(&self, application_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM interviews WHERE application_id = $1",
        )
        .bind(application_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_active_interviews(&self, application_id: Uuid, excluding: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM interviews
            WHERE application_id = $1 AND id <> $2 AND status IN ('SCHEDULED', 'IN_PROGRESS')
            "#,
        )
        .bind(application_id)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl AssessmentRepository for PgStore {
    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<Assessment> {
        let inserted = sqlx::query_as::<_, Assessment>(
            r#"
            INSERT INTO assessments (
                interview_id, technical_skills, communication, problem_solving, cultural_fit,
                overall_rating, strengths, weaknesses, comments, recommendation, assessed_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(assessment.interview_id)
        .bind(assessment.technical_skills)
        .bind(assessment.communication)
        .bind(assessment.problem_solving)
        .bind(assessment.cultural_fit)
        .bind(assessment.overall_rating)
        .bind(&assessment.strengths)
        .bind(&assessment.weaknesses)
        .bind(&assessment.comments)
        .bind(assessment.recommendation)
        .bind(assessment.assessed_by)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(created) => Ok(created),
            Err(err) if is_unique_violation(&err) => {
                let existing = self
                    .find_assessment_for_interview(assessment.interview_id)
                    .await?
                    .ok_or(Error::Database(err))?;
                Err(Error::conflict(
                    "An assessment already exists for this interview",
                    existing.id,
                ))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_assessment(&self, id: Uuid) -> Result<Option<Assessment>> {
        let assessment = sqlx::query_as::<_, Assessment>("SELECT * FROM assessments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(assessment)
    }

    async fn find_assessment_for_interview(&self, interview_id: Uuid) -> Result<Option<Assessment>> {
        let assessment =
            sqlx::query_as::<_, Assessment>("SELECT * FROM assessments WHERE interview_id = $1")
                .bind(interview_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(assessment)
    }

    async fn update_assessment(&self, id: Uuid, changes: AssessmentChanges) -> Result<Assessment> {
        sqlx::query_as::<_, Assessment>(
            r#"
            UPDATE assessments
            SET
                technical_skills = COALESCE($2, technical_skills),
                communication = COALESCE($3, communication),
                problem_solving = COALESCE($4, problem_solving),
                cultural_fit = COALESCE($5, cultural_fit),
                overall_rating = COALESCE($6, overall_rating),
                strengths = COALESCE($7, strengths),
                weaknesses = COALESCE($8, weaknesses),
                comments = COALESCE($9, comments),
                recommendation = COALESCE($10, recommendation),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.technical_skills)
        .bind(changes.communication)
        .bind(changes.problem_solving)
        .bind(changes.cultural_fit)
        .bind(changes.overall_rating)
        .bind(changes.strengths)
        .bind(changes.weaknesses)
        .bind(changes.comments)
        .bind(changes.recommendation)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Assessment", id))
    }
}

#[async_trait]
impl OfferRepository for PgStore {
    async fn insert_offer(&self, offer: NewOffer) -> Result<Offer> {
        let created = sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (
                application_id, candidate_email, position_title, department, salary, currency,
                start_date, expires_at, benefits, notes, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(offer.application_id)
        .bind(&offer.candidate_email)
        .bind(&offer.position_title)
        .bind(&offer.department)
        .bind(offer.salary)
        .bind(&offer.currency)
        .bind(offer.start_date)
        .bind(offer.expires_at)
        .bind(&offer.benefits)
        .bind(&offer.notes)
        .bind(offer.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>> {
        let offer = sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(offer)
    }

    async fn find_open_offer_for_application(&self, application_id: Uuid) -> Result<Option<Offer>> {
        let offer = sqlx::query_as::<_, Offer>(
            r#"
            SELECT * FROM offers
            WHERE application_id = $1 AND status <> 'REJECTED'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(offer)
    }

    async fn list_offers(&self, filter: &OfferFilter) -> Result<Vec<Offer>> {
        let items = sqlx::query_as::<_, Offer>(
            r#"
            SELECT * FROM offers
            WHERE ($1::uuid IS NULL OR application_id = $1)
              AND ($2::text IS NULL OR candidate_email = lower($2))
              AND ($3::offer_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.application_id)
        .bind(filter.candidate_email.as_deref())
        .bind(filter.status)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn set_offer_status(&self, id: Uuid, status: OfferStatus) -> Result<Offer> {
        sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers
            SET status = $2,
                responded_at = CASE WHEN $2 IN ('ACCEPTED'::offer_status, 'REJECTED'::offer_status)
                                    THEN NOW() ELSE responded_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Offer", id))
    }

    async fn accept_offer(
        &self,
        offer_id: Uuid,
        account_id: Uuid,
        profile: NewEmployeeProfile,
    ) -> Result<OfferAcceptance> {
        let mut tx = self.pool.begin().await?;

        let offer = sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers
            SET status = 'ACCEPTED', responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status IN ('PENDING', 'SENT')
            RETURNING *
            "#,
        )
        .bind(offer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::InvalidOperation("offer is no longer awaiting a response".to_string()))?;

        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(offer.application_id)
        .bind(lifecycle::on_offer_accepted())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::not_found("Application", offer.application_id))?;

        let promoted = sqlx::query(
            r#"
            UPDATE accounts
            SET role = CASE WHEN role = 'CANDIDATE' THEN 'EMPLOYEE'::user_role ELSE role END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;
        if promoted.rows_affected() == 0 {
            return Err(Error::not_found("Account", account_id));
        }

        let employee = Self::upsert_profile_tx(&mut tx, account_id, profile).await?;
        tx.commit().await?;

        Ok(OfferAcceptance {
            offer,
            application,
            employee,
        })
    }
}
