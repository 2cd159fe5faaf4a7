//! Translation handlers
//!
//! Exports are served from the export cache and may lag behind updates by
//! up to the configured TTL.

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use lingo_core::validation::{validate_new, validate_patch};
use lingo_core::{ExportMap, LingoError, Page, TranslationEntry, TranslationFilter, TranslationId};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    locale: Option<String>,
    key: Option<String>,
    tag: Option<String>,
    page: Option<String>,
}

impl ListQuery {
    /// Unparseable page numbers fall back to the first page.
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<TranslationEntry>>, ApiError> {
    let page = query.page();
    let filter = TranslationFilter::new(query.locale, query.key, query.tag);

    let result = state.translations.search(&filter, page).await?;
    Ok(Json(result))
}

pub async fn create(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TranslationEntry>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let data = validate_new(&body).map_err(LingoError::from)?;

    debug!("User {} creating translation {}", identity.user_id, data.key);
    let entry = state.translations.create(data).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TranslationEntry>, ApiError> {
    let entry = state.translations.find(parse_id(&id)?).await?;

    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let data = validate_patch(&body).map_err(LingoError::from)?;

    debug!("User {} updating translation {}", identity.user_id, entry.id);
    let updated = state.translations.update(&entry, data).await?;
    Ok(Json(updated))
}

pub async fn export(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> Result<Json<ExportMap>, ApiError> {
    let mapping = state.exports.export(&locale).await?;
    Ok(Json(mapping))
}

/// Ids that are not integers cannot exist.
fn parse_id(raw: &str) -> Result<TranslationId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Translation not found: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_parsing() {
        let query = |page: Option<&str>| ListQuery {
            page: page.map(str::to_string),
            ..Default::default()
        };
        assert_eq!(query(None).page(), 1);
        assert_eq!(query(Some("3")).page(), 3);
        assert_eq!(query(Some("abc")).page(), 1);
        assert_eq!(query(Some("-2")).page(), 1);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id("twelve").unwrap_err().status, StatusCode::NOT_FOUND);
    }
}
