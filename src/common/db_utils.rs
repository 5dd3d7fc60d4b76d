// src/common/db_utils.rs

use crate::common::error::AppError;

/// Converte violação de chave estrangeira em 400; o resto segue como erro de banco.
pub(crate) fn map_reference_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            let detail = match db_err.constraint() {
                Some(c) if c.contains("customer_id") => "customer_id does not reference an existing customer",
                Some(c) if c.contains("inbox_ref") => "inbox_ref does not reference an existing inbox message",
                _ => "Referenced record does not exist",
            };
            return AppError::BadRequest(detail.to_string());
        }
    }
    e.into()
}

/// Escapa os curingas do LIKE para que a busca seja por substring literal.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("ana"), "%ana%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn non_database_errors_stay_internal() {
        let err = map_reference_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
