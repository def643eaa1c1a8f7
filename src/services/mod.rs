pub mod application_service;
pub mod assessment_service;
pub mod auth_service;
pub mod employee_service;
pub mod interview_service;
pub mod job_service;
pub mod notification_service;
pub mod offer_service;
pub mod upload_service;
