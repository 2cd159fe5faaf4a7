//! Storage trait for translation persistence

use crate::Result;
use async_trait::async_trait;
use lingo_types::{
    ExportMap, NewTranslation, PageRequest, TranslationEntry, TranslationFilter, TranslationId,
    TranslationPatch,
};

/// Translation store
///
/// Owns every persisted entry. Implementations enforce `(locale, key)`
/// uniqueness and report it as `LingoError::ConstraintViolation`.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Persist a new entry, assigning its id and timestamps.
    async fn insert(&self, entry: &NewTranslation) -> Result<TranslationEntry>;

    async fn find_by_id(&self, id: TranslationId) -> Result<Option<TranslationEntry>>;

    /// Apply `patch` to the entry, failing with `NotFound` if it does not exist.
    async fn update_by_id(
        &self,
        id: TranslationId,
        patch: &TranslationPatch,
    ) -> Result<TranslationEntry>;

    /// Entries passing `filter` ordered by id, plus the unpaginated match count.
    async fn query_filtered(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> Result<(Vec<TranslationEntry>, u64)>;

    /// Every key -> value pair of one locale.
    async fn query_by_locale(&self, locale: &str) -> Result<ExportMap>;
}
