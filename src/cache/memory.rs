//! Memory Store Module
//!
//! In-process implementation of [`DistributedStore`] for local runs and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::store::cancellable;
use crate::cache::{CacheEntryOptions, Clock, DistributedStore, StoredEntry, SystemClock};
use crate::error::{CacheError, Result};

// == Memory Store ==
/// HashMap-backed store with expiry resolved against an injectable clock.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the live entry under `key`, expired entries excluded.
    pub async fn entry(&self, key: &str) -> Option<StoredEntry> {
        let now = self.clock.now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }

    /// Writes raw text under `key` with the default expiration, bypassing
    /// serialization. Handy for seeding malformed payloads.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let now = self.clock.now();
        let expires_at = CacheEntryOptions::default().expires_at(now)?;
        self.entries
            .write()
            .await
            .insert(key.into(), StoredEntry::new(value.into(), now, expires_at));
        Ok(())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of entries held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DistributedStore for MemoryStore {
    async fn get_string(&self, key: &str, cancel: &CancellationToken) -> Result<Option<String>> {
        cancellable(cancel, async {
            let now = self.clock.now();
            let mut entries = self.entries.write().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    debug!(
                        "Memory hit for key '{}' ({}s to live)",
                        key,
                        entry.ttl_remaining(now).num_seconds()
                    );
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }

            entries.remove(key);
            debug!("Dropped expired key '{}'", key);
            Ok::<_, CacheError>(None)
        })
        .await
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
        cancel: &CancellationToken,
    ) -> Result<()> {
        cancellable(cancel, async {
            let now = self.clock.now();
            let expires_at = options.expires_at(now)?;
            self.entries
                .write()
                .await
                .insert(key.to_string(), StoredEntry::new(value.to_string(), now, expires_at));
            Ok::<_, CacheError>(())
        })
        .await
    }

    async fn remove(&self, key: &str, cancel: &CancellationToken) -> Result<()> {
        cancellable(cancel, async {
            self.entries.write().await.remove(key);
            Ok::<_, CacheError>(())
        })
        .await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn manual_store() -> (Arc<ManualClock>, MemoryStore) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let store = MemoryStore::with_clock(clock.clone());
        (clock, store)
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let (_, store) = manual_store();
        let cancel = CancellationToken::new();

        store
            .set_string("key1", "value1", &CacheEntryOptions::default(), &cancel)
            .await
            .unwrap();

        let value = store.get_string("key1", &cancel).await.unwrap();
        assert_eq!(value.as_deref(), Some("value1"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let (_, store) = manual_store();
        let cancel = CancellationToken::new();
        let options = CacheEntryOptions::default();

        store.set_string("key1", "value1", &options, &cancel).await.unwrap();
        store.set_string("key1", "value2", &options, &cancel).await.unwrap();

        let value = store.get_string("key1", &cancel).await.unwrap();
        assert_eq!(value.as_deref(), Some("value2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_expiration() {
        let (clock, store) = manual_store();
        let cancel = CancellationToken::new();
        let options = CacheEntryOptions::expire_after(Duration::from_secs(60));

        store.set_string("key1", "value1", &options, &cancel).await.unwrap();

        clock.advance(chrono::Duration::seconds(59));
        assert!(store.get_string("key1", &cancel).await.unwrap().is_some());

        clock.advance(chrono::Duration::seconds(1));
        assert!(store.get_string("key1", &cancel).await.unwrap().is_none());
        assert!(store.is_empty().await, "Expired entry should be dropped on read");
    }

    #[tokio::test]
    async fn test_store_remove_nonexistent() {
        let (_, store) = manual_store();
        let cancel = CancellationToken::new();

        assert!(store.remove("missing", &cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_purge_expired() {
        let (clock, store) = manual_store();
        let cancel = CancellationToken::new();

        store
            .set_string("short", "a", &CacheEntryOptions::expire_after(Duration::from_secs(1)), &cancel)
            .await
            .unwrap();
        store
            .set_string("long", "b", &CacheEntryOptions::expire_after(Duration::from_secs(10)), &cancel)
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(2));

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.entry("long").await.is_some());
    }

    #[tokio::test]
    async fn test_store_rejects_past_expiration() {
        let (clock, store) = manual_store();
        let cancel = CancellationToken::new();
        let options = CacheEntryOptions::expire_at(clock.now());

        let result = store.set_string("key", "value", &options, &cancel).await;
        assert!(matches!(result, Err(CacheError::InvalidExpiration(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_cancelled() {
        let (_, store) = manual_store();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = store
            .set_string("key", "value", &CacheEntryOptions::default(), &cancel)
            .await;
        assert!(matches!(result, Err(CacheError::Cancelled)));
        assert!(store.is_empty().await);
    }
}
