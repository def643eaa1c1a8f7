use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::auth_dto::AccountResponse,
    dto::employee_dto::{
        CreateEmployeePayload, EmployeeListQuery, EmployeeResponse, UpdateEmployeePayload,
    },
    error::Result,
    middleware::auth::Session,
    policy::access::Capability,
    utils::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Account and profile created", body = Json<EmployeeResponse>),
        (status = 403, description = "Only administrators may grant privileged roles"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    JsonBody(payload): JsonBody<CreateEmployeePayload>,
) -> Result<impl IntoResponse> {
    let record = state.employee_service.provision(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(record))))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("department" = Option<String>, Query, description = "Filter by department"),
        ("status" = Option<String>, Query, description = "ACTIVE, ON_LEAVE or TERMINATED")
    ),
    responses(
        (status = 200, description = "Employee directory", body = Json<Vec<EmployeeResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewEmployees)?;
    let records = state.employee_service.list(query).await?;
    let items: Vec<EmployeeResponse> = records.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee profile ID")),
    responses(
        (status = 200, description = "Employee found", body = Json<EmployeeResponse>),
        (status = 404, description = "Employee not found")
    )
)]
#[axum::debug_handler]
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    session.require(Capability::ViewEmployees)?;
    let record = state.employee_service.get_by_id(id).await?;
    Ok(Json(EmployeeResponse::from(record)))
}

#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee profile ID")),
    request_body = UpdateEmployeePayload,
    responses(
        (status = 200, description = "Employee updated", body = Json<EmployeeResponse>),
        (status = 404, description = "Employee not found")
    )
)]
#[axum::debug_handler]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateEmployeePayload>,
) -> Result<impl IntoResponse> {
    let record = state.employee_service.update(id, payload).await?;
    Ok(Json(EmployeeResponse::from(record)))
}

#[utoipa::path(
    post,
    path = "/api/accounts/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deactivated", body = Json<AccountResponse>),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Account not found")
    )
)]
#[axum::debug_handler]
pub async fn deactivate_account(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let account = state
        .employee_service
        .deactivate_account(&session, id)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}
