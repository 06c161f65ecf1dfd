// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helpers de classificação de erros do SQLx
// ---

/// `true` quando o erro veio de uma constraint UNIQUE.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// Erro que o próprio banco recusou (constraint, FK, CHECK...), em oposição a
/// falhas de conexão ou de pool.
pub(crate) fn is_rejected_by_database(err: &AppError) -> bool {
    matches!(err, AppError::DatabaseError(sqlx::Error::Database(_)))
}

/// Converte violação de unicidade num erro amigável; o resto vira DatabaseError.
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> AppError {
    if is_unique_violation(&err) {
        return AppError::UniqueConstraintViolation(what.to_string());
    }
    AppError::DatabaseError(err)
}
