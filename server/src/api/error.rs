use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::FieldErrors;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::ErrorResponse;
use crate::membership::MembershipError;

const CONSTRAINT_REJECTED: &str = "One or more submitted values are not allowed";

/// Validation failure body: a summary plus field-keyed messages.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub fields: BTreeMap<String, Vec<String>>,
}

/// Error type returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The requested state change conflicts with the current state (toggle
    /// already applied, empty cart). Reported as a client error.
    #[error("{0}")]
    Conflict(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("permission denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(FieldErrors::single(field, message))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: fields.into_map(),
                }),
            )
                .into_response(),
            ApiError::Conflict(message) => error_body(StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => error_body(
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided".to_string(),
            ),
            ApiError::Forbidden => error_body(
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action".to_string(),
            ),
            ApiError::NotFound(what) => {
                error_body(StatusCode::NOT_FOUND, format!("{} not found", what))
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn error_body(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<DieselError> for ApiError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::NotFound => ApiError::NotFound("Object"),
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                tracing::warn!(
                    constraint = info.constraint_name().unwrap_or_default(),
                    error = info.message(),
                    "check constraint rejected write"
                );
                ApiError::Conflict(CONSTRAINT_REJECTED.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(error: PoolError) -> Self {
        ApiError::Internal(format!("Database connection failed: {}", error))
    }
}

impl From<MembershipError> for ApiError {
    fn from(error: MembershipError) -> Self {
        match error {
            MembershipError::AlreadyPresent(message)
            | MembershipError::NotPresent(message)
            | MembershipError::SelfReference(message) => ApiError::Conflict(message.to_string()),
            MembershipError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::field("name", "required"), StatusCode::BAD_REQUEST),
            (ApiError::Conflict("dup".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotFound("Recipe"), StatusCode::NOT_FOUND),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_diesel_not_found_maps_to_404() {
        assert!(matches!(
            ApiError::from(DieselError::NotFound),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_membership_conflicts_are_client_errors() {
        let error =
            ApiError::from(MembershipError::AlreadyPresent("Recipe is already in favorites"));
        match error {
            ApiError::Conflict(message) => assert_eq!(message, "Recipe is already in favorites"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_check_violation_hides_database_text() {
        let error = ApiError::from(DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("violates check constraint \"recipes_cooking_time_check\"".to_string()),
        ));
        match error {
            ApiError::Conflict(message) => {
                assert_eq!(message, CONSTRAINT_REJECTED);
                assert!(!message.contains("constraint"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
