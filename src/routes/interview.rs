use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::interview_dto::{
        CreateInterviewPayload, InterviewListQuery, InterviewResponse, UpdateInterviewPayload,
    },
    error::Result,
    middleware::auth::Session,
    policy::access::Capability,
    utils::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateInterviewPayload>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(
        ("application_id" = Option<Uuid>, Query, description = "Filter by application"),
        ("job_id" = Option<Uuid>, Query, description = "Filter by job"),
        ("status" = Option<String>, Query, description = "Filter by interview status")
    ),
    responses(
        (status = 200, description = "Interviews", body = Json<Vec<InterviewResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewRecruitment)?;
    let interviews = state.interview_service.list(query).await?;
    let items: Vec<InterviewResponse> = interviews.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview found", body = Json<InterviewResponse>),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewRecruitment)?;
    let interview = state.interview_service.get_by_id(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    patch,
    path = "/api/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<InterviewResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.update(id, payload).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    delete,
    path = "/api/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 204, description = "Interview and its assessment deleted"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.interview_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
