//! Error types for Lingo

use crate::validation::ValidationErrors;
use lingo_types::TranslationId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LingoError>;

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("The given data was invalid")]
    Validation(ValidationErrors),

    #[error("Translation not found: {0}")]
    NotFound(TranslationId),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl LingoError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LingoError::Validation(_) => "validation_failed",
            LingoError::NotFound(_) => "not_found",
            LingoError::ConstraintViolation(_) => "conflict",
            LingoError::Unauthenticated(_) => "unauthorized",
            LingoError::Database(_) => "database_error",
            LingoError::Serialization(_) => "serialization_error",
            LingoError::Config(_) => "config_error",
        }
    }
}

impl From<ValidationErrors> for LingoError {
    fn from(e: ValidationErrors) -> Self {
        LingoError::Validation(e)
    }
}

impl From<serde_json::Error> for LingoError {
    fn from(e: serde_json::Error) -> Self {
        LingoError::Serialization(e.to_string())
    }
}
