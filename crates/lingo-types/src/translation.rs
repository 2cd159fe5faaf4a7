//! Translation entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Store-assigned identifier of a translation entry
pub type TranslationId = i64;

/// Unordered set of tags attached to an entry
pub type TagSet = BTreeSet<String>;

/// Full key -> value mapping of one locale
pub type ExportMap = BTreeMap<String, String>;

/// A persisted translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub id: TranslationId,
    pub locale: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub tags: TagSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checked input for creating an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    pub locale: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub tags: TagSet,
}

/// Checked partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPatch {
    pub locale: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub tags: Option<TagSet>,
}

impl TranslationPatch {
    pub fn is_empty(&self) -> bool {
        self.locale.is_none() && self.key.is_none() && self.value.is_none() && self.tags.is_none()
    }

    /// Apply the supplied fields on top of `entry`.
    ///
    /// Identity and timestamps are left to the caller.
    pub fn apply_to(&self, entry: &mut TranslationEntry) {
        if let Some(locale) = &self.locale {
            entry.locale = locale.clone();
        }
        if let Some(key) = &self.key {
            entry.key = key.clone();
        }
        if let Some(value) = &self.value {
            entry.value = value.clone();
        }
        if let Some(tags) = &self.tags {
            entry.tags = tags.clone();
        }
    }
}

/// Search filters, AND-composed. An absent filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationFilter {
    pub locale: Option<String>,
    pub key: Option<String>,
    pub tag: Option<String>,
}

impl TranslationFilter {
    /// Build a filter, dropping empty values the same way a missing one is dropped.
    pub fn new(locale: Option<String>, key: Option<String>, tag: Option<String>) -> Self {
        Self {
            locale: non_empty(locale),
            key: non_empty(key),
            tag: non_empty(tag),
        }
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = non_empty(Some(locale.into()));
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = non_empty(Some(key.into()));
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = non_empty(Some(tag.into()));
        self
    }

    /// Whether `entry` passes every present filter.
    ///
    /// `key` is a case-sensitive substring match, `tag` is exact membership.
    pub fn matches(&self, entry: &TranslationEntry) -> bool {
        self.locale.as_deref().map_or(true, |l| entry.locale == l)
            && self.key.as_deref().map_or(true, |k| entry.key.contains(k))
            && self.tag.as_deref().map_or(true, |t| entry.tags.contains(t))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
