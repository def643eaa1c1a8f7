use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplicationListResponse, ApplicationResponse, CandidateApplicationsQuery},
    dto::offer_dto::{OfferDecisionResponse, OfferResponse, RespondOfferPayload},
    error::Result,
    middleware::auth::Session,
    utils::{extract::JsonBody, validation::validate},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidate/applications",
    params(("email" = Option<String>, Query, description = "Candidate email; defaults to the caller's")),
    responses(
        (status = 200, description = "Applications for the email", body = Json<ApplicationListResponse>),
        (status = 403, description = "Email belongs to someone else")
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<CandidateApplicationsQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .application_service
        .list_for_candidate(&session, query.email)
        .await?;
    Ok(Json(ApplicationListResponse::from(items)))
}

#[utoipa::path(
    post,
    path = "/api/candidate/applications/{id}/withdraw",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application withdrawn", body = Json<ApplicationResponse>),
        (status = 403, description = "Not the caller's application"),
        (status = 422, description = "Application already closed")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.withdraw(&session, id).await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    get,
    path = "/api/candidate/offers",
    responses(
        (status = 200, description = "Offers extended to the caller", body = Json<Vec<OfferResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_offers(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let offers = state.offer_service.list_for_candidate(&session).await?;
    let items: Vec<OfferResponse> = offers.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/candidate/offers/{id}/respond",
    params(("id" = Uuid, Path, description = "Offer ID")),
    request_body = RespondOfferPayload,
    responses(
        (status = 200, description = "Decision recorded", body = Json<OfferDecisionResponse>),
        (status = 400, description = "Unknown decision"),
        (status = 403, description = "Offer was extended to someone else"),
        (status = 422, description = "Offer no longer awaiting a response")
    )
)]
#[axum::debug_handler]
pub async fn respond_to_offer(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<RespondOfferPayload>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let response = state
        .offer_service
        .respond(&session, id, &payload.decision)
        .await?;
    Ok(Json(response))
}
