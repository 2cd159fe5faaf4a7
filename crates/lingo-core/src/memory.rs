//! In-memory translation store
//!
//! Behaves like the SQLite store (id order, `(locale, key)` uniqueness) and
//! counts full-locale scans so tests can observe export cache traffic.

use crate::ports::TranslationStore;
use crate::{LingoError, Result};
use async_trait::async_trait;
use chrono::Utc;
use lingo_types::{
    ExportMap, NewTranslation, PageRequest, TranslationEntry, TranslationFilter, TranslationId,
    TranslationPatch,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    locale_scans: AtomicUsize,
}

#[derive(Default)]
struct Inner {
    last_id: TranslationId,
    entries: BTreeMap<TranslationId, TranslationEntry>,
}

impl Inner {
    fn key_taken(&self, locale: &str, key: &str, except: Option<TranslationId>) -> bool {
        self.entries
            .values()
            .any(|e| e.locale == locale && e.key == key && Some(e.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `query_by_locale` calls served so far
    pub fn locale_scans(&self) -> usize {
        self.locale_scans.load(Ordering::SeqCst)
    }
}

fn duplicate(locale: &str, key: &str) -> LingoError {
    LingoError::ConstraintViolation(format!(
        "key '{}' already exists for locale '{}'",
        key, locale
    ))
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn insert(&self, entry: &NewTranslation) -> Result<TranslationEntry> {
        let mut inner = self.inner.write().await;
        if inner.key_taken(&entry.locale, &entry.key, None) {
            return Err(duplicate(&entry.locale, &entry.key));
        }

        inner.last_id += 1;
        let now = Utc::now();
        let stored = TranslationEntry {
            id: inner.last_id,
            locale: entry.locale.clone(),
            key: entry.key.clone(),
            value: entry.value.clone(),
            tags: entry.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.entries.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: TranslationId) -> Result<Option<TranslationEntry>> {
        Ok(self.inner.read().await.entries.get(&id).cloned())
    }

    async fn update_by_id(
        &self,
        id: TranslationId,
        patch: &TranslationPatch,
    ) -> Result<TranslationEntry> {
        let mut inner = self.inner.write().await;
        let mut updated = inner
            .entries
            .get(&id)
            .cloned()
            .ok_or(LingoError::NotFound(id))?;

        patch.apply_to(&mut updated);
        if inner.key_taken(&updated.locale, &updated.key, Some(id)) {
            return Err(duplicate(&updated.locale, &updated.key));
        }
        updated.updated_at = Utc::now();
        inner.entries.insert(id, updated.clone());

        Ok(updated)
    }

    async fn query_filtered(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> Result<(Vec<TranslationEntry>, u64)> {
        let inner = self.inner.read().await;
        let matching: Vec<&TranslationEntry> =
            inner.entries.values().filter(|e| filter.matches(e)).collect();
        let total = matching.len() as u64;

        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn query_by_locale(&self, locale: &str) -> Result<ExportMap> {
        self.locale_scans.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .values()
            .filter(|e| e.locale == locale)
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn new(locale: &str, key: &str) -> NewTranslation {
        NewTranslation {
            locale: locale.to_string(),
            key: key.to_string(),
            value: format!("{locale}:{key}"),
            tags: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let store = MemoryStore::new();
        let a = assert_ok!(store.insert(&new("en", "a")).await);
        let b = assert_ok!(store.insert(&new("en", "b")).await);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_locale_key_uniqueness() {
        let store = MemoryStore::new();
        store.insert(&new("en", "a")).await.unwrap();
        store.insert(&new("fr", "a")).await.unwrap();

        let err = store.insert(&new("en", "a")).await.unwrap_err();
        assert!(matches!(err, LingoError::ConstraintViolation(_)));

        let b = store.insert(&new("en", "b")).await.unwrap();
        let patch = TranslationPatch {
            key: Some("a".into()),
            ..Default::default()
        };
        let err = store.update_by_id(b.id, &patch).await.unwrap_err();
        assert!(matches!(err, LingoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let store = MemoryStore::new();
        let err = assert_err!(store.update_by_id(42, &TranslationPatch::default()).await);
        assert!(matches!(err, LingoError::NotFound(42)));
    }
}
