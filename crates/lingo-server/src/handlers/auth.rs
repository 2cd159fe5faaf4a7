//! Authentication handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use lingo_core::{AuthTokens, LingoError, User, UserLogin, UserRegistration};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    tokens: AuthTokens,
    user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    id: String,
    email: String,
    name: Option<String>,
}

impl LoginResponse {
    fn new(user: User, tokens: AuthTokens) -> Self {
        Self {
            tokens,
            user: UserInfo {
                id: user.id,
                email: user.email,
                name: user.name,
            },
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<UserLogin>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("Login attempt for: {}", req.email);

    let (user, tokens) = state
        .auth_service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            error!("Login error: {}", e);
            ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", "Invalid credentials")
        })?;

    info!("Login successful for: {}", req.email);
    Ok(Json(LoginResponse::new(user, tokens)))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<UserRegistration>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    info!("Registration attempt for: {}", req.email);

    if !req.email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if req.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let existing = state
        .db
        .get_user_by_email(&req.email)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(email_taken());
    }

    // A concurrent registration can still win between the check and the insert
    let (user, tokens) = state
        .auth_service
        .register(&req.email, &req.password, req.name.as_deref())
        .await
        .map_err(registration_error)?;

    info!("Registration successful for: {}", req.email);
    Ok((StatusCode::CREATED, Json(LoginResponse::new(user, tokens))))
}

fn email_taken() -> ApiError {
    ApiError::new(StatusCode::CONFLICT, "conflict", "Email already registered")
}

fn registration_error(e: anyhow::Error) -> ApiError {
    match e.downcast_ref::<LingoError>() {
        Some(LingoError::ConstraintViolation(_)) => email_taken(),
        _ => ApiError::internal(format!("Registration error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthService;
    use crate::storage::Database;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lost_registration_race_is_conflict() {
        let db = Arc::new(Database::in_memory().await.unwrap());
        let auth = AuthService::new(db, "secret".into(), chrono::Duration::days(1));
        auth.register("dev@example.com", "secret123", None)
            .await
            .unwrap();

        // Second insert skips the existence check, as a racing request would
        let err = auth
            .register("dev@example.com", "secret123", None)
            .await
            .unwrap_err();
        let api = registration_error(err);
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, "conflict");
    }

    #[test]
    fn test_other_registration_failures_are_internal() {
        let api = registration_error(anyhow::anyhow!("disk full"));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
