pub mod application;
pub mod assessment;
pub mod auth;
pub mod candidate;
pub mod employee;
pub mod health;
pub mod interview;
pub mod job;
pub mod offer;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::{authenticate, require_capability},
    cors::cors_layer,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::policy::access::Capability;
use crate::AppState;

/// Room for the non-file form fields on top of the resume itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Checks `capability` ahead of the handler's extractors.
fn guarded(capability: Capability, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(capability, require_capability))
}

pub fn build_router(state: AppState) -> Router {
    use Capability::*;

    let upload_limit = state.config.max_resume_bytes + FORM_OVERHEAD_BYTES;

    let public_api = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/public/jobs", get(job::list_public_jobs))
        .route("/api/public/jobs/:id", get(job::get_public_job))
        .route(
            "/api/public/applications",
            post(application::submit_application).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(from_fn_with_state(
            RateLimiter::new(state.config.public_rps, state.config.trust_forwarded_for),
            rps_middleware,
        ));

    let private_api = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/jobs",
            get(job::list_jobs).merge(guarded(ManageJobs, post(job::create_job))),
        )
        .route(
            "/api/jobs/:id",
            get(job::get_job).merge(guarded(
                ManageJobs,
                patch(job::update_job).delete(job::delete_job),
            )),
        )
        .route("/api/applications", get(application::list_applications))
        .route("/api/applications/:id", get(application::get_application))
        .route(
            "/api/applications/:id/status",
            guarded(
                ManageApplications,
                patch(application::update_application_status),
            ),
        )
        .route(
            "/api/applications/:id/resume",
            get(application::download_resume),
        )
        .route(
            "/api/applications/:id/interviews",
            get(application::list_application_interviews),
        )
        .route(
            "/api/interviews",
            get(interview::list_interviews)
                .merge(guarded(ManageInterviews, post(interview::create_interview))),
        )
        .route(
            "/api/interviews/:id",
            get(interview::get_interview).merge(guarded(
                ManageInterviews,
                patch(interview::update_interview).delete(interview::delete_interview),
            )),
        )
        .route(
            "/api/interviews/:id/assessment",
            get(assessment::get_interview_assessment),
        )
        .route(
            "/api/assessments",
            guarded(ManageAssessments, post(assessment::create_assessment)),
        )
        .route(
            "/api/assessments/:id",
            get(assessment::get_assessment).merge(guarded(
                ManageAssessments,
                patch(assessment::update_assessment),
            )),
        )
        .route(
            "/api/offers",
            get(offer::list_offers).merge(guarded(ManageOffers, post(offer::create_offer))),
        )
        .route("/api/offers/:id", get(offer::get_offer))
        .route(
            "/api/offers/:id/send",
            guarded(ManageOffers, post(offer::send_offer)),
        )
        .route(
            "/api/candidate/applications",
            get(candidate::list_my_applications),
        )
        .route(
            "/api/candidate/applications/:id/withdraw",
            post(candidate::withdraw_application),
        )
        .route("/api/candidate/offers", get(candidate::list_my_offers))
        .route(
            "/api/candidate/offers/:id/respond",
            guarded(RespondToOffers, post(candidate::respond_to_offer)),
        )
        .route(
            "/api/employees",
            get(employee::list_employees)
                .merge(guarded(ManageEmployees, post(employee::create_employee))),
        )
        .route(
            "/api/employees/:id",
            get(employee::get_employee)
                .merge(guarded(ManageEmployees, patch(employee::update_employee))),
        )
        .route(
            "/api/accounts/:id/deactivate",
            guarded(ManageAccounts, post(employee::deactivate_account)),
        )
        .layer(from_fn_with_state(state.clone(), authenticate));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .merge(public_api)
        .merge(private_api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
