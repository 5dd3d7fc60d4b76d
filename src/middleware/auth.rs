// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState};

// Aplicado em todas as rotas da API, menos o health check
pub async fn auth_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();

    if let Err(e) = app_state.auth_service.verify(bearer.as_ref().map(|auth| auth.token())) {
        tracing::warn!("Requisição rejeitada em {}: {}", request.uri().path(), e);
        return Err(e);
    }

    Ok(next.run(request).await)
}
