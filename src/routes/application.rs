use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationListResponse, ApplicationResponse, ApplicationSubmission,
        ResumeUpload, UpdateApplicationStatusPayload,
    },
    dto::interview_dto::InterviewResponse,
    error::{field_error, Result},
    middleware::auth::Session,
    policy::access::Capability,
    utils::{extract::JsonBody, validation::validate},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/public/applications",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid form or resume"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied for this job"),
        (status = 422, description = "Job is not accepting applications")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut submission = ApplicationSubmission::default();
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_id" => {
                let raw = field.text().await?;
                let id = raw
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| field_error("job_id", "invalid", "job_id must be a UUID"))?;
                submission.job_id = Some(id);
            }
            "candidate_name" | "name" => submission.candidate_name = field.text().await?,
            "candidate_email" | "email" => submission.candidate_email = field.text().await?,
            "candidate_phone" | "phone" => submission.candidate_phone = Some(field.text().await?),
            "cover_letter" => submission.cover_letter = field.text().await?,
            "resume" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    resume = Some(ResumeUpload { filename, data });
                }
            }
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    let application = state
        .application_service
        .submit(submission, resume)
        .await?;
    Ok((StatusCode::CREATED, Json(ApplicationResponse::from(application))))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("job_id" = Option<Uuid>, Query, description = "Filter by job"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("email" = Option<String>, Query, description = "Filter by candidate email")
    ),
    responses(
        (status = 200, description = "Applications", body = Json<ApplicationListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewRecruitment)?;
    let items = state.application_service.list(query).await?;
    Ok(Json(ApplicationListResponse::from(items)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application found", body = Json<ApplicationResponse>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewRecruitment)?;
    let application = state.application_service.get_by_id(id).await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationResponse>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let application = state
        .application_service
        .update_status(id, &payload.status, payload.notes)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/resume",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Resume file"),
        (status = 404, description = "Application or resume not found")
    )
)]
#[axum::debug_handler]
pub async fn download_resume(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewRecruitment)?;
    let file = state.application_service.resume(id).await?;
    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];
    Ok((headers, file.data))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/interviews",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Interviews for the application", body = Json<Vec<InterviewResponse>>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn list_application_interviews(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewRecruitment)?;
    let interviews = state.interview_service.for_application(id).await?;
    let items: Vec<InterviewResponse> = interviews.into_iter().map(Into::into).collect();
    Ok(Json(items))
}
