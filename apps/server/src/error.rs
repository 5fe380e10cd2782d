use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use sharebook_core::errors::{DatabaseError, Error as CoreError};
use sharebook_core::transactions::LedgerError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: u16,
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

fn ledger_status(err: &LedgerError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        LedgerError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None),
        LedgerError::InvalidTransactionShape {
            transaction_type,
            rule,
        } => (
            StatusCode::BAD_REQUEST,
            "INVALID_TRANSACTION_SHAPE",
            Some(json!({ "transactionType": transaction_type, "rule": rule.code() })),
        ),
        LedgerError::TransactionNotFound(_) => {
            (StatusCode::NOT_FOUND, "TRANSACTION_NOT_FOUND", None)
        }
        LedgerError::SecurityClassNotFound(_) => {
            (StatusCode::NOT_FOUND, "SECURITY_CLASS_NOT_FOUND", None)
        }
        LedgerError::EntityNotFound(_) => (StatusCode::NOT_FOUND, "ENTITY_NOT_FOUND", None),
        LedgerError::MemberNotFound(ids) => (
            StatusCode::NOT_FOUND,
            "MEMBER_NOT_FOUND",
            Some(json!({ "memberIds": ids })),
        ),
        LedgerError::SecurityClassArchived(_) => {
            (StatusCode::CONFLICT, "SECURITY_CLASS_ARCHIVED", None)
        }
        LedgerError::MemberInUse(_) => (StatusCode::CONFLICT, "MEMBER_IN_USE", None),
    }
}

fn core_status(err: &CoreError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        CoreError::Ledger(e) => ledger_status(e),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION", None),
        CoreError::InvalidConfigValue(_) => (StatusCode::BAD_REQUEST, "VALIDATION", None),
        CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, "CONSTRAINT_VIOLATION", None),
        CoreError::Database(DatabaseError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", None)
        }
        CoreError::Database(
            DatabaseError::UniqueViolation(_) | DatabaseError::ForeignKeyViolation(_),
        ) => (StatusCode::CONFLICT, "CONSTRAINT_VIOLATION", None),
        CoreError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE", None),
        CoreError::Export(_) | CoreError::Unexpected(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", None)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, details) = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", None),
        };

        // Persistence details stay in the log; callers get an opaque message.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(kind, error = %self, "request rejected");
            self.to_string()
        };

        let body = Json(ErrorBody {
            code: status.as_u16(),
            kind,
            message,
            details,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sharebook_core::transactions::{ShapeRule, TransactionType};

    fn status_of(err: CoreError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_ledger_errors_map_to_statuses() {
        assert_eq!(
            status_of(LedgerError::Unauthorized.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(LedgerError::shape(TransactionType::Issue, ShapeRule::ToMemberRequired).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(LedgerError::TransactionNotFound("t".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(LedgerError::SecurityClassArchived("c".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LedgerError::MemberInUse("m".into()).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_persistence_failures_are_opaque_500s() {
        assert_eq!(
            status_of(CoreError::Database(DatabaseError::QueryFailed(
                "disk I/O error".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(CoreError::ConstraintViolation("dup".into())),
            StatusCode::CONFLICT
        );
    }
}
