//! SeaORM -> DomainError translation helpers.
//!
//! Adapters should convert `sea_orm::DbErr` into `crate::errors::domain::DomainError`
//! here, and higher layers can then map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::web::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column" error messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    if let Some(prefix) = error_msg.find("UNIQUE constraint failed: ") {
        let rest = &error_msg[prefix + "UNIQUE constraint failed: ".len()..];
        let table_column = rest
            .split_whitespace()
            .next()
            .or_else(|| rest.split('\n').next())
            .or_else(|| rest.split('"').next());
        return table_column;
    }
    None
}

/// Map SQLite table.column format to domain-specific conflict errors.
fn map_sqlite_table_column_to_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "users.username" => Some((ConflictKind::UniqueUsername, "Username already taken")),
        "user_credentials.email" => {
            Some((ConflictKind::UniqueEmail, "Email already registered"))
        }
        _ => None,
    }
}

/// Map PostgreSQL constraint names to domain-specific conflict errors.
fn map_postgres_constraint_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("users_username_key") {
        return Some((ConflictKind::UniqueUsername, "Username already taken"));
    }
    if error_msg.contains("user_credentials_email_key") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        // SQLite reports table.column; try that first
        if let Some(table_column) = extract_sqlite_table_column(&error_msg) {
            if let Some((kind, detail)) = map_sqlite_table_column_to_conflict(table_column) {
                return DomainError::conflict(kind, detail);
            }
        }

        // PostgreSQL reports the constraint name
        if let Some((kind, detail)) = map_postgres_constraint_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation("Foreign key constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation("Check constraint violation");
    }

    if error_msg.contains("timeout")
        || error_msg.contains("pool")
        || error_msg.contains("unavailable")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_username_conflict() {
        let err = sea_orm::DbErr::Custom(
            "error returned from database: (code: 2067) UNIQUE constraint failed: users.username"
                .into(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::UniqueUsername, _)
        ));
    }

    #[test]
    fn test_sqlite_email_conflict() {
        let err = sea_orm::DbErr::Custom(
            "UNIQUE constraint failed: user_credentials.email".into(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::UniqueEmail, _)
        ));
    }

    #[test]
    fn test_postgres_email_conflict() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"user_credentials_email_key\"".into(),
        );
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::UniqueEmail, _)
        ));
    }

    #[test]
    fn test_unknown_unique_violation_is_generic_conflict() {
        let err = sea_orm::DbErr::Custom("SQLSTATE(23505) something_else_key".into());
        let mapped = map_db_err(err);
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::Other(_), _)
        ));
    }

    #[test]
    fn test_unhandled_is_infra() {
        let err = sea_orm::DbErr::Custom("syntax error near SELECT".into());
        let mapped = map_db_err(err);
        assert!(matches!(mapped, DomainError::Infra(_, _)));
    }
}
