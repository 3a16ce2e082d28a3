//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use core_kernel::{CoreError, PortError};
use domain_activity::ActivityError;
use domain_session::SessionError;
use domain_submission::SubmissionError;

use crate::auth::AuthError;

/// One field-level problem, shown inline next to the field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

impl FieldDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<FieldDetail>,
    },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn busy() -> Self {
        ApiError::Conflict("Another action on this session is still in progress".to_string())
    }

    pub fn no_wizard() -> Self {
        ApiError::NotFound("No wizard is open".to_string())
    }

    pub fn validation(details: Vec<FieldDetail>) -> Self {
        ApiError::Validation {
            message: "Please correct the highlighted fields".to_string(),
            details,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                Some(details),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { resource, id } => {
                ApiError::NotFound(format!("{resource} not found: {id}"))
            }
            PortError::Validation { message, field } => ApiError::validation(vec![FieldDetail::new(
                field.unwrap_or_default(),
                message,
            )]),
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Unauthorized { message } => ApiError::Unauthorized(message),
            PortError::Internal { message, .. } => ApiError::Internal(message),
            other => {
                warn!(error = %other, "Upstream call failed");
                ApiError::Upstream(other.to_string())
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(errors) => ApiError::validation(
                errors
                    .into_iter()
                    .map(|e| FieldDetail::new(e.field, e.message))
                    .collect(),
            ),
            SubmissionError::ReasonRequired => {
                ApiError::validation(vec![FieldDetail::new("reason", err.to_string())])
            }
            SubmissionError::UnknownCoverage(_) => {
                ApiError::validation(vec![FieldDetail::new("coverage", err.to_string())])
            }
            SubmissionError::Locked(_)
            | SubmissionError::WrongStep { .. }
            | SubmissionError::NotSubmitted => ApiError::Conflict(err.to_string()),
            SubmissionError::DraftNotFound(_) => ApiError::NotFound(err.to_string()),
            SubmissionError::Core(e) => e.into(),
            SubmissionError::Persistence(e) => e.into(),
        }
    }
}

impl From<ActivityError> for ApiError {
    fn from(err: ActivityError) -> Self {
        match err {
            ActivityError::Port(e) => e.into(),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            SessionError::Validation(errors) => {
                let mut details: Vec<FieldDetail> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            let message = e
                                .message
                                .as_ref()
                                .map_or_else(|| e.code.to_string(), ToString::to_string);
                            FieldDetail::new(field.to_string(), message)
                        })
                    })
                    .collect();
                details.sort_by(|a, b| a.field.cmp(&b.field));
                ApiError::validation(details)
            }
            SessionError::NotFound(_) => ApiError::Unauthorized("Session has ended".to_string()),
            SessionError::Upstream(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing => ApiError::Internal(err.to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}
