//! Translation service
//!
//! Stateless layer between the HTTP handlers and the store. Store failures
//! are passed through untouched.

use crate::ports::TranslationStore;
use crate::{LingoError, Result};
use lingo_types::{
    NewTranslation, Page, PageRequest, TranslationEntry, TranslationFilter, TranslationId,
    TranslationPatch,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Entries per page of `search`
pub const PAGE_SIZE: u32 = 50;

pub struct TranslationService {
    store: Arc<dyn TranslationStore>,
}

impl TranslationService {
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store }
    }

    pub async fn search(
        &self,
        filter: &TranslationFilter,
        page: u32,
    ) -> Result<Page<TranslationEntry>> {
        let request = PageRequest::new(page, PAGE_SIZE);
        debug!("Searching translations: {:?}, page={}", filter, request.page);

        let (items, total) = self.store.query_filtered(filter, request).await?;
        Ok(Page::new(items, total, request))
    }

    pub async fn create(&self, data: NewTranslation) -> Result<TranslationEntry> {
        let entry = self.store.insert(&data).await?;
        info!(
            "Created translation: id={}, locale={}, key={}",
            entry.id, entry.locale, entry.key
        );
        Ok(entry)
    }

    pub async fn find(&self, id: TranslationId) -> Result<TranslationEntry> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(LingoError::NotFound(id))
    }

    /// Change only the fields present in `data`.
    pub async fn update(
        &self,
        entry: &TranslationEntry,
        data: TranslationPatch,
    ) -> Result<TranslationEntry> {
        let updated = self.store.update_by_id(entry.id, &data).await?;
        info!(
            "Updated translation: id={}, locale={}, key={}",
            updated.id, updated.locale, updated.key
        );
        Ok(updated)
    }
}
