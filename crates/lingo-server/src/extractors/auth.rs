//! Auth extractor for protected routes
//!
//! Runs before the handler body, so a request without a valid bearer token
//! never reaches the service or the store.

use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lingo_core::{Identity, LingoError};
use serde_json::json;
use tracing::{debug, error};

/// Authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

/// Auth error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "unauthorized",
            message: message.into(),
        }
    }

    /// Backend failure; details go to the log, not the client
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code
        }));
        (self.status, body).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::unauthorized("Invalid Authorization format"))?;

        match state.authenticator.authenticate(token).await {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(LingoError::Unauthenticated(reason)) => {
                debug!("Rejected bearer token: {}", reason);
                Err(AuthError::unauthorized("Unauthenticated."))
            }
            Err(e) => {
                error!("Authentication failed: {}", e);
                Err(AuthError::internal())
            }
        }
    }
}
