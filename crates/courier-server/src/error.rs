//! The single response-formatting boundary for API errors.
//!
//! Every handler error funnels through [`ApiError`], which serializes
//! as `{"error": {"kind": ..., "message": ...}}` with a stable,
//! machine-readable kind tag. Internal details (datastore, crypto)
//! are logged and replaced with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use courier_core::error::CourierError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "validation_error",
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "bad_request",
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            kind: "authentication_error",
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl From<CourierError> for ApiError {
    fn from(err: CourierError) -> Self {
        match err {
            CourierError::Validation { message } => Self::validation(message),
            CourierError::AuthenticationFailed { reason } => Self::unauthorized(reason),
            CourierError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                kind: "not_found",
                message: err.to_string(),
            },
            CourierError::BadRequest { message } | CourierError::Provider { message } => {
                Self::bad_request(message)
            }
            CourierError::Database(_) | CourierError::Crypto(_) | CourierError::Internal(_) => {
                tracing::error!(error = %err, "internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    kind: "internal_error",
                    message: "internal server error".into(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "kind": self.kind,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_errors_map_to_stable_kinds() {
        let err = ApiError::from(CourierError::NotFound {
            entity: "project".into(),
            id: "abc".into(),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.kind, "not_found");

        let err = ApiError::from(CourierError::AuthenticationFailed {
            reason: "invalid API key".into(),
        });
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.kind, "authentication_error");

        let err = ApiError::from(CourierError::BadRequest {
            message: "nope".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, "bad_request");
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = ApiError::from(CourierError::Database("connection refused".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal server error");
    }
}
