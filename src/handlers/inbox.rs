// src/handlers/inbox.rs

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
    models::inbox::{CreateInboxPayload, InboxListParams, InboxMessage, UpdateInboxPayload},
};

// GET /api/inbox
#[utoipa::path(
    get,
    path = "/api/inbox",
    tag = "Inbox",
    params(InboxListParams),
    responses(
        (status = 200, description = "Mensagens da inbox", body = Vec<InboxMessage>)
    ),
    security(("api_token" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    ApiQuery(params): ApiQuery<InboxListParams>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state
        .inbox_service
        .list_messages(&app_state.db_pool, &params)
        .await?;

    Ok((StatusCode::OK, Json(messages)))
}

// GET /api/inbox/{inbox_id}
#[utoipa::path(
    get,
    path = "/api/inbox/{inbox_id}",
    tag = "Inbox",
    params(("inbox_id" = Uuid, Path, description = "ID da mensagem")),
    responses(
        (status = 200, description = "Mensagem", body = InboxMessage),
        (status = 404, description = "Mensagem não encontrada", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn get_message(
    State(app_state): State<AppState>,
    ApiPath(inbox_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let message = app_state
        .inbox_service
        .get_message(&app_state.db_pool, inbox_id)
        .await?;

    Ok((StatusCode::OK, Json(message)))
}

// POST /api/inbox
#[utoipa::path(
    post,
    path = "/api/inbox",
    tag = "Inbox",
    request_body = CreateInboxPayload,
    responses(
        (status = 200, description = "Mensagem ingerida (ou a existente, se o dedupe_key repetir)", body = InboxMessage),
        (status = 400, description = "Dados inválidos", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn ingest_message(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CreateInboxPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let message = app_state
        .inbox_service
        .ingest_message(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::OK, Json(message)))
}

// PUT /api/inbox/{inbox_id}
#[utoipa::path(
    put,
    path = "/api/inbox/{inbox_id}",
    tag = "Inbox",
    params(("inbox_id" = Uuid, Path, description = "ID da mensagem")),
    request_body = UpdateInboxPayload,
    responses(
        (status = 200, description = "Mensagem atualizada", body = InboxMessage),
        (status = 400, description = "Nenhum campo para atualizar", body = ErrorResponse),
        (status = 404, description = "Mensagem não encontrada", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn update_message(
    State(app_state): State<AppState>,
    ApiPath(inbox_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateInboxPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let message = app_state
        .inbox_service
        .update_message(&app_state.db_pool, inbox_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(message)))
}

// DELETE /api/inbox/{inbox_id}
#[utoipa::path(
    delete,
    path = "/api/inbox/{inbox_id}",
    tag = "Inbox",
    params(("inbox_id" = Uuid, Path, description = "ID da mensagem")),
    responses(
        (status = 200, description = "Mensagem removida", body = MessageResponse),
        (status = 404, description = "Mensagem não encontrada", body = ErrorResponse)
    ),
    security(("api_token" = []))
)]
pub async fn delete_message(
    State(app_state): State<AppState>,
    ApiPath(inbox_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inbox_service
        .delete_message(&app_state.db_pool, inbox_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Inbox message deleted"))))
}
