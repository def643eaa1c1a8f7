use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::offer_dto::{CreateOfferPayload, OfferListQuery, OfferResponse},
    error::Result,
    middleware::auth::Session,
    policy::access::Capability,
    utils::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/offers",
    request_body = CreateOfferPayload,
    responses(
        (status = 201, description = "Offer created; application moved to OFFERED", body = Json<OfferResponse>),
        (status = 409, description = "Application already has an open offer")
    )
)]
#[axum::debug_handler]
pub async fn create_offer(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    JsonBody(payload): JsonBody<CreateOfferPayload>,
) -> Result<impl IntoResponse> {
    let offer = state.offer_service.create(session.account_id, payload).await?;
    Ok((StatusCode::CREATED, Json(OfferResponse::from(offer))))
}

#[utoipa::path(
    get,
    path = "/api/offers",
    params(
        ("application_id" = Option<Uuid>, Query, description = "Filter by application"),
        ("email" = Option<String>, Query, description = "Filter by candidate email"),
        ("status" = Option<String>, Query, description = "Filter by offer status")
    ),
    responses(
        (status = 200, description = "Offers", body = Json<Vec<OfferResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_offers(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<OfferListQuery>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ManageOffers)?;
    let offers = state.offer_service.list(query).await?;
    let items: Vec<OfferResponse> = offers.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/offers/{id}",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer found", body = Json<OfferResponse>),
        (status = 404, description = "Offer not found")
    )
)]
#[axum::debug_handler]
pub async fn get_offer(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ManageOffers)?;
    let offer = state.offer_service.get_by_id(id).await?;
    Ok(Json(OfferResponse::from(offer)))
}

#[utoipa::path(
    post,
    path = "/api/offers/{id}/send",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer sent", body = Json<OfferResponse>),
        (status = 422, description = "Offer is not pending")
    )
)]
#[axum::debug_handler]
pub async fn send_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let offer = state.offer_service.send(id).await?;
    Ok(Json(OfferResponse::from(offer)))
}
