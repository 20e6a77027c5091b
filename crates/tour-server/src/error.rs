//! HTTP error responses.
//!
//! [`ApiError`] bridges [`TourError`] and axum: every core error maps to one
//! status code and a stable machine-readable code.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tour_core::TourError;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 401: the gateway did not identify the caller.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message)
    }

    /// 403: the caller's role may not use the endpoint.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    /// 400: the request body or path could not be decoded.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<TourError> for ApiError {
    fn from(err: TourError) -> Self {
        use TourError::*;

        let (status, code) = match &err {
            TourNotFound { .. } | ExecutionNotFound { .. } | NoActiveExecution { .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            Unauthorized { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            NotEditable { .. }
            | NotPublishable { .. }
            | NotArchivable { .. }
            | NotUnarchivable { .. }
            | NotExecutable { .. }
            | ExecutionNotActive { .. } => (StatusCode::CONFLICT, "INVALID_STATE"),
            ActiveExecutionExists { .. } => (StatusCode::CONFLICT, "ACTIVE_EXECUTION_EXISTS"),
            PaymentRequired { .. } => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_REQUIRED"),
            InvalidInput { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            SagaRollback { .. } => (StatusCode::BAD_GATEWAY, "SAGA_ROLLBACK"),
            DependencyUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "DEPENDENCY_UNAVAILABLE")
            }
            CompensationFailed { .. }
            | Database { .. }
            | FileSystem { .. }
            | XdgDirectory(_)
            | Serialization { .. }
            | Configuration { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        Self::new(status, code, err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{} {}: {}", self.status, self.code, self.message);
        } else {
            log::debug!("{} {}: {}", self.status, self.code, self.message);
        }

        let body = ErrorBody {
            code: self.code,
            error: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
