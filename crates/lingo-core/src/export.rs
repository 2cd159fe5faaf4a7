//! Read-through export cache
//!
//! Holds one snapshot per locale. A snapshot is served until its TTL runs
//! out, even if entries of that locale change in the meantime; the next
//! request after expiry recomputes it from the store. Nothing is ever
//! evicted, an expired snapshot is simply overwritten.
//!
//! Each locale has its own slot guarded by an async mutex, so concurrent
//! misses on one locale trigger a single store read and locales never wait
//! on each other.

use crate::clock::Clock;
use crate::ports::TranslationStore;
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use lingo_types::ExportMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Seconds a snapshot stays live unless configured otherwise
pub const DEFAULT_EXPORT_TTL_SECS: i64 = 60;

/// Lifecycle of one locale slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Absent,
    Live,
    /// Still stored, but the next export recomputes it
    Stale,
}

struct Snapshot {
    mapping: ExportMap,
    expires_at: DateTime<Utc>,
}

type Slot = Arc<Mutex<Option<Snapshot>>>;

pub struct ExportCache {
    store: Arc<dyn TranslationStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slots: DashMap<String, Slot>,
}

impl ExportCache {
    pub fn new(store: Arc<dyn TranslationStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            slots: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Key -> value mapping of `locale`, at most `ttl` old.
    ///
    /// The returned map is a copy; mutating it does not touch the cache.
    pub async fn export(&self, locale: &str) -> Result<ExportMap> {
        // Clone the slot out so the shard lock is released before awaiting
        let slot = self.slots.entry(locale.to_string()).or_default().clone();
        let mut guard = slot.lock().await;

        let now = self.clock.now();
        if let Some(snapshot) = guard.as_ref() {
            if now < snapshot.expires_at {
                debug!("Export cache hit: locale={}", locale);
                return Ok(snapshot.mapping.clone());
            }
        }

        debug!("Export cache miss: locale={}", locale);
        let mapping = self.store.query_by_locale(locale).await?;
        *guard = Some(Snapshot {
            mapping: mapping.clone(),
            expires_at: now + self.ttl,
        });

        Ok(mapping)
    }

    pub async fn state(&self, locale: &str) -> SlotState {
        let Some(slot) = self.slots.get(locale).map(|s| s.value().clone()) else {
            return SlotState::Absent;
        };

        let guard = slot.lock().await;
        match guard.as_ref() {
            None => SlotState::Absent,
            Some(s) if self.clock.now() < s.expires_at => SlotState::Live,
            Some(_) => SlotState::Stale,
        }
    }
}
