//! Port traits (interfaces) for dependency injection

pub mod auth;
pub mod storage;

pub use auth::Authenticator;
pub use storage::TranslationStore;
