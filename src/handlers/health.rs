// src/handlers/health.rs

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "CRM API is running")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Customer not found")]
    pub detail: String,
}

// GET /api/
#[utoipa::path(
    get,
    path = "/api/",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço no ar", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("CRM API is running"))
}
