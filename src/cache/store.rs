//! Distributed Store Module
//!
//! The string-oriented key/value contract the cache service is built on.

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cache::CacheEntryOptions;
use crate::error::{CacheError, Result};

/// An out-of-process key/value store holding serialized cache entries.
///
/// Every call is cancellable: once `cancel` fires the pending I/O is dropped and
/// the call fails with [`CacheError::Cancelled`].
#[async_trait]
pub trait DistributedStore: Send + Sync {
    /// Fetch the raw text stored under `key`, `None` if absent or expired.
    async fn get_string(&self, key: &str, cancel: &CancellationToken) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set_string(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn remove(&self, key: &str, cancel: &CancellationToken) -> Result<()>;
}

// == Cancellation ==
/// Runs `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CacheError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_completes() {
        let cancel = CancellationToken::new();
        let result = cancellable(&cancel, async { Ok::<_, CacheError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancellable_already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<()> = cancellable(&cancel, std::future::pending::<Result<()>>()).await;
        assert!(matches!(result, Err(CacheError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancellable_cancelled_while_pending() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result: Result<()> = cancellable(&cancel, std::future::pending::<Result<()>>()).await;
        assert!(matches!(result, Err(CacheError::Cancelled)));
    }
}
