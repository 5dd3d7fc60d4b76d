// src/common/error.rs

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("No fields to update")]
    NothingToUpdate,

    #[error("{0}")]
    BadRequest(String),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Qualquer falha do banco vira 500; o detalhe fica só no log.
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NothingToUpdate
            | AppError::BadRequest(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem que vai para o cliente no campo `detail`.
    fn detail(&self) -> String {
        match self {
            AppError::ValidationError(errors) => {
                // "campo: mensagem" para cada erro, em ordem estável
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, field_errors)| {
                        let messages: Vec<String> = field_errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        format!("{}: {}", field, messages.join(", "))
                    })
                    .collect();
                fields.sort();
                fields.join("; ")
            }
            AppError::DatabaseError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let body = Json(json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}

// Rejeições dos extratores do axum viram 400 com o mesmo formato `{detail}`.

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Score {
        #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
        value: i32,
    }

    #[test]
    fn maps_each_variant_to_its_status() {
        assert_eq!(AppError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("Lead").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NothingToUpdate.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn hides_database_details_from_the_client() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        assert_eq!(err.detail(), "Internal server error");
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(AppError::NotFound("Customer").detail(), "Customer not found");
    }

    #[test]
    fn validation_detail_lists_field_messages() {
        let errors = Score { value: 42 }.validate().unwrap_err();
        let detail = AppError::from(errors).detail();
        assert_eq!(detail, "value: must be between 1 and 10");
    }
}
