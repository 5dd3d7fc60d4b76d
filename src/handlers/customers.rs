// src/handlers/customers.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    config::AppState,
    handlers::health::{ErrorResponse, MessageResponse},
    models::customer::{
        CreateCustomerPayload, Customer, CustomerOverview, CustomerOverviewParams,
        CustomerThreadEntry, ThreadParams, UpdateCustomerPayload,
    },
};

// GET /api/customers/overview
#[utoipa::path(
    get,
    path = "/api/customers/overview",
    tag = "Customers",
    params(CustomerOverviewParams),
    responses(
        (status = 200, description = "Clientes com agregados de inbox e leads", body = Vec<CustomerOverview>),
        (status = 401, description = "Token inválido ou ausente", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn list_overview(
    State(app_state): State<AppState>,
    ApiQuery(params): ApiQuery<CustomerOverviewParams>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .customer_service
        .list_overview(&app_state.db_pool, &params)
        .await?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/{customer_id}
#[utoipa::path(
    get,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    ApiPath(customer_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state
        .customer_service
        .get_customer(&app_state.db_pool, customer_id)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 200, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .create_customer(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/customers/{customer_id}
#[utoipa::path(
    put,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 400, description = "Nenhum campo para atualizar", body = ErrorResponse),
        (status = 404, description = "Cliente não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    ApiPath(customer_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .update_customer(&app_state.db_pool, customer_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{customer_id}
#[utoipa::path(
    delete,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido; leads apagados e inbox desvinculada", body = MessageResponse),
        (status = 404, description = "Cliente não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    ApiPath(customer_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .customer_service
        .delete_customer(&app_state.db_pool, customer_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Customer deleted"))))
}

// GET /api/customers/{customer_id}/thread
#[utoipa::path(
    get,
    path = "/api/customers/{customer_id}/thread",
    tag = "Customers",
    params(
        ("customer_id" = Uuid, Path, description = "ID do cliente"),
        ThreadParams
    ),
    responses(
        (status = 200, description = "Mensagens e eventos de lead, mais recentes primeiro", body = Vec<CustomerThreadEntry>),
        (status = 404, description = "Cliente não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn get_thread(
    State(app_state): State<AppState>,
    ApiPath(customer_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<ThreadParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state
        .customer_service
        .get_thread(&app_state.db_pool, customer_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}
