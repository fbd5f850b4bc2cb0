use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::workflow::engine::WorkflowError;

/// Request-boundary error taxonomy. Every handler failure resolves to one of
/// these; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(&'static str),
    /// Action not defined for the current status, including the case where
    /// the status changed between read and write.
    #[error("{0}")]
    InvalidTransition(String),
    #[error("Internal Server Error")]
    Database(#[from] sqlx::Error),
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // store/internal details are logged, never sent to the caller
        match self {
            ApiError::Database(e) => tracing::error!(error = %e, "database error"),
            ApiError::Internal(e) => tracing::error!(error = %e, "internal error"),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidTransition { .. } => ApiError::InvalidTransition(err.to_string()),
            WorkflowError::Forbidden(msg) => ApiError::Forbidden(msg.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveStatus;
    use crate::workflow::engine::LeaveAction;

    #[test]
    fn status_codes_per_variant() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("leave request not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidTransition("stale".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn workflow_errors_map_onto_the_taxonomy() {
        let invalid = WorkflowError::InvalidTransition {
            from: LeaveStatus::Cancelled,
            action: LeaveAction::Approve,
        };
        assert!(matches!(
            ApiError::from(invalid),
            ApiError::InvalidTransition(_)
        ));

        let forbidden = WorkflowError::Forbidden("cannot approve or reject your own request");
        assert!(matches!(ApiError::from(forbidden), ApiError::Forbidden(_)));
    }

    #[test]
    fn database_errors_do_not_leak_detail() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
