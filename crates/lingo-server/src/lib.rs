//! Lingo translation server
//!
//! Axum routes over the translation service and export cache, backed by an
//! embedded SQLite database.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod services;
pub mod storage;

use axum::{
    routing::{get, post, put},
    Router,
};
use lingo_core::ports::Authenticator;
use lingo_core::{Clock, ExportCache, TranslationService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::services::AuthService;
use crate::storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub translations: Arc<TranslationService>,
    pub exports: Arc<ExportCache>,
    pub auth_service: Arc<AuthService>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Composition root: wires the store, clock and auth into the services.
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>, config: &ServerConfig) -> Self {
        let translations = Arc::new(TranslationService::new(db.clone()));
        let exports = Arc::new(ExportCache::new(
            db.clone(),
            clock,
            config.export_cache_ttl(),
        ));
        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            config.jwt_secret(),
            config.token_ttl(),
        ));

        Self {
            db,
            translations,
            exports,
            authenticator: auth_service.clone(),
            auth_service,
        }
    }
}

/// Full router with middleware
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/user", get(handlers::users::me))
        .route(
            "/translations",
            get(handlers::translations::list).post(handlers::translations::create),
        )
        .route("/translations/:id", put(handlers::translations::update))
        .route(
            "/translations/export/:locale",
            get(handlers::translations::export),
        )
}
