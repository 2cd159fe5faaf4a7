//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lingo_core::{LingoError, ValidationErrors};
use serde_json::json;
use tracing::error;

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub errors: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl From<LingoError> for ApiError {
    fn from(e: LingoError) -> Self {
        let status = match &e {
            LingoError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LingoError::NotFound(_) => StatusCode::NOT_FOUND,
            LingoError::ConstraintViolation(_) => StatusCode::CONFLICT,
            LingoError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            LingoError::Database(_) | LingoError::Serialization(_) | LingoError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let code = e.code();
        match e {
            LingoError::Validation(errors) => Self {
                status,
                code,
                message: errors
                    .first_message()
                    .unwrap_or("The given data was invalid.")
                    .to_string(),
                errors: Some(errors),
            },
            other => Self::new(status, code, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        }

        let body = match self.errors {
            Some(errors) => json!({
                "error": "The given data was invalid",
                "code": self.code,
                "message": self.message,
                "errors": errors,
            }),
            None => json!({
                "error": self.message,
                "code": self.code,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LingoError::NotFound(1), StatusCode::NOT_FOUND),
            (
                LingoError::ConstraintViolation("dup".into()),
                StatusCode::CONFLICT,
            ),
            (
                LingoError::Unauthenticated("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                LingoError::Database("locked".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_validation_keeps_field_errors() {
        let mut errors = ValidationErrors::default();
        errors.add("key", "The key field is required.");

        let api = ApiError::from(LingoError::Validation(errors));
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.message, "The key field is required.");
        assert!(api.errors.is_some());
    }
}
