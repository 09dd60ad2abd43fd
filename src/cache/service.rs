//! Cache Service Module
//!
//! Typed get/set/remove over a [`DistributedStore`], with JSON as the wire format.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::store::cancellable;
use crate::cache::{CacheEntryOptions, DistributedStore};
use crate::error::{CacheError, Result};

/// A value that can be written to and read back from the cache.
///
/// Values are encoded as JSON. Cyclic graphs cannot be expressed with owned
/// serde types, so cached values must be trees.
pub trait CacheValue: Serialize + DeserializeOwned + Send + Sync {}

impl<T> CacheValue for T where T: Serialize + DeserializeOwned + Send + Sync {}

// == Cache Trait ==
/// Typed access to a distributed cache.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch and decode the value under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent, holds blank text, or holds
    /// text that does not decode as `T`.
    async fn get<T: CacheValue>(&self, key: &str, cancel: &CancellationToken) -> Result<Option<T>>;

    /// Cache-aside read: on a miss, run `factory`, store a present result with
    /// the default expiration and return it.
    ///
    /// A factory returning `Ok(None)` stores nothing. A factory error is
    /// returned as [`CacheError::Factory`].
    async fn get_or_insert_with<T, F, Fut>(
        &self,
        key: &str,
        factory: F,
        cancel: &CancellationToken,
    ) -> Result<Option<T>>
    where
        T: CacheValue,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<Option<T>>> + Send;

    /// Encode and store `value` under `key`. `None` is a no-op.
    ///
    /// Without `options` the entry expires one day after the write.
    async fn set<T: CacheValue>(
        &self,
        key: &str,
        value: Option<&T>,
        options: Option<&CacheEntryOptions>,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// Delete the entry under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str, cancel: &CancellationToken) -> Result<()>;
}

// == Cache Service ==
/// The [`Cache`] implementation used by the service.
///
/// Stateless apart from the shared store handle, so it is freely shared across
/// concurrent requests.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn DistributedStore>,
    default_options: CacheEntryOptions,
}

impl CacheService {
    /// Creates a service over `store` with the one-day default expiration.
    pub fn new(store: Arc<dyn DistributedStore>) -> Self {
        Self {
            store,
            default_options: CacheEntryOptions::default(),
        }
    }
}

#[async_trait]
impl Cache for CacheService {
    async fn get<T: CacheValue>(&self, key: &str, cancel: &CancellationToken) -> Result<Option<T>> {
        let raw = match self.store.get_string(key, cancel).await? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                debug!("Cache miss for key '{}'", key);
                return Ok(None);
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!("Cache hit for key '{}'", key);
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    async fn get_or_insert_with<T, F, Fut>(
        &self,
        key: &str,
        factory: F,
        cancel: &CancellationToken,
    ) -> Result<Option<T>>
    where
        T: CacheValue,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<Option<T>>> + Send,
    {
        if let Some(cached) = self.get::<T>(key, cancel).await? {
            return Ok(Some(cached));
        }

        let value = cancellable(cancel, async { factory().await.map_err(CacheError::Factory) }).await?;

        if let Some(value) = &value {
            self.set(key, Some(value), None, cancel).await?;
        }

        Ok(value)
    }

    async fn set<T: CacheValue>(
        &self,
        key: &str,
        value: Option<&T>,
        options: Option<&CacheEntryOptions>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };

        let serialized = serde_json::to_string(value)?;
        let options = options.unwrap_or(&self.default_options);
        self.store.set_string(key, &serialized, options, cancel).await?;

        debug!("Cached key '{}' ({} bytes)", key, serialized.len());
        Ok(())
    }

    async fn remove(&self, key: &str, cancel: &CancellationToken) -> Result<()> {
        self.store.remove(key, cancel).await?;
        debug!("Removed key '{}'", key);
        Ok(())
    }
}
