use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::assessment_dto::{AssessmentResponse, CreateAssessmentPayload, UpdateAssessmentPayload},
    error::Result,
    middleware::auth::Session,
    policy::access::Capability,
    utils::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/assessments",
    request_body = CreateAssessmentPayload,
    responses(
        (status = 201, description = "Assessment recorded", body = Json<AssessmentResponse>),
        (status = 400, description = "Ratings outside 1-10"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview already assessed")
    )
)]
#[axum::debug_handler]
pub async fn create_assessment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    JsonBody(payload): JsonBody<CreateAssessmentPayload>,
) -> Result<impl IntoResponse> {
    let assessment = state
        .assessment_service
        .create(session.account_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(AssessmentResponse::from(assessment))))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Assessment found", body = Json<AssessmentResponse>),
        (status = 404, description = "Assessment not found")
    )
)]
#[axum::debug_handler]
pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewAssessments)?;
    let assessment = state.assessment_service.get_by_id(id).await?;
    Ok(Json(AssessmentResponse::from(assessment)))
}

#[utoipa::path(
    patch,
    path = "/api/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    request_body = UpdateAssessmentPayload,
    responses(
        (status = 200, description = "Assessment updated", body = Json<AssessmentResponse>),
        (status = 400, description = "Ratings outside 1-10"),
        (status = 404, description = "Assessment not found")
    )
)]
#[axum::debug_handler]
pub async fn update_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateAssessmentPayload>,
) -> Result<impl IntoResponse> {
    let assessment = state.assessment_service.update(id, payload).await?;
    Ok(Json(AssessmentResponse::from(assessment)))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}/assessment",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Assessment for the interview", body = Json<AssessmentResponse>),
        (status = 404, description = "No assessment recorded")
    )
)]
#[axum::debug_handler]
pub async fn get_interview_assessment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewAssessments)?;
    let assessment = state.assessment_service.for_interview(id).await?;
    Ok(Json(AssessmentResponse::from(assessment)))
}
