pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod repository;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::repository::Store;
use crate::services::{
    application_service::ApplicationService, assessment_service::AssessmentService,
    auth_service::AuthService, employee_service::EmployeeService,
    interview_service::InterviewService, job_service::JobService,
    notification_service::{NotificationService, NotificationSink},
    offer_service::OfferService, upload_service::UploadService,
};
use crate::utils::token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub interview_service: InterviewService,
    pub assessment_service: AssessmentService,
    pub offer_service: OfferService,
    pub employee_service: EmployeeService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>, sink: Arc<dyn NotificationSink>) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_ttl_minutes);
        let notification_service = NotificationService::new(sink);
        let uploads = UploadService::new(config.uploads_dir.clone(), config.max_resume_bytes);

        let auth_service = AuthService::new(store.clone(), tokens.clone());
        let job_service = JobService::new(store.clone());
        let application_service = ApplicationService::new(
            store.clone(),
            notification_service.clone(),
            uploads,
            config.transition_policy,
        );
        let interview_service = InterviewService::new(store.clone(), application_service.clone());
        let assessment_service = AssessmentService::new(store.clone());
        let offer_service = OfferService::new(
            store.clone(),
            application_service.clone(),
            notification_service.clone(),
        );
        let employee_service = EmployeeService::new(store);

        Self {
            config: Arc::new(config),
            tokens,
            auth_service,
            job_service,
            application_service,
            interview_service,
            assessment_service,
            offer_service,
            employee_service,
            notification_service,
        }
    }
}
