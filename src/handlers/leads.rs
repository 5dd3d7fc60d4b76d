// src/handlers/leads.rs

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
    models::lead::{CreateLeadPayload, Lead, LeadListParams, UpdateLeadPayload},
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(LeadListParams),
    responses(
        (status = 200, description = "Lista de leads", body = Vec<Lead>),
        (status = 400, description = "Filtro inválido", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    ApiQuery(params): ApiQuery<LeadListParams>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state
        .lead_service
        .list_leads(&app_state.db_pool, &params)
        .await?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/{lead_id}
#[utoipa::path(
    get,
    path = "/api/leads/{lead_id}",
    tag = "Leads",
    params(("lead_id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Lead não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    ApiPath(lead_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state
        .lead_service
        .get_lead(&app_state.db_pool, lead_id)
        .await?;

    Ok((StatusCode::OK, Json(lead)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 200, description = "Lead criado (ou o existente, se o dedupe_key repetir)", body = Lead),
        (status = 400, description = "Dados inválidos ou cliente inexistente", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .lead_service
        .create_lead(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/leads/{lead_id}
#[utoipa::path(
    put,
    path = "/api/leads/{lead_id}",
    tag = "Leads",
    params(("lead_id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "Nenhum campo para atualizar", body = ErrorResponse),
        (status = 404, description = "Lead não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    ApiPath(lead_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .lead_service
        .update_lead(&app_state.db_pool, lead_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{lead_id}
#[utoipa::path(
    delete,
    path = "/api/leads/{lead_id}",
    tag = "Leads",
    params(("lead_id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead removido", body = MessageResponse),
        (status = 404, description = "Lead não encontrado", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    ApiPath(lead_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .lead_service
        .delete_lead(&app_state.db_pool, lead_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Lead deleted"))))
}
