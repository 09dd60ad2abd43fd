//! Redis-backed distributed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::Cmd;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::store::cancellable;
use crate::cache::{CacheEntryOptions, DistributedStore, Expiration};
use crate::error::{CacheError, Result};

/// Redis store over a multiplexed, auto-reconnecting connection.
///
/// Keys are prefixed with the configured instance name so several
/// applications can share one database.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    instance_name: String,
}

impl RedisStore {
    /// Connect to `url` (`redis://` or `rediss://`).
    ///
    /// Fails if the server cannot be reached.
    pub async fn connect(url: &str, instance_name: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            instance_name: instance_name.into(),
        })
    }

    fn instance_key(&self, key: &str) -> String {
        prefixed_key(&self.instance_name, key)
    }
}

/// Joins the instance prefix and the caller's key.
pub fn prefixed_key(instance_name: &str, key: &str) -> String {
    format!("{}{}", instance_name, key)
}

// == Commands ==
fn get_command(redis_key: &str) -> Cmd {
    let mut cmd = redis::cmd("GET");
    cmd.arg(redis_key);
    cmd
}

/// Builds `SET key value PX|PXAT ..` for a write at `now`.
///
/// Relative expirations go out as `PX`, absolute ones as `PXAT`.
fn set_command(
    redis_key: &str,
    value: &str,
    options: &CacheEntryOptions,
    now: DateTime<Utc>,
) -> Result<Cmd> {
    let expires_at = options.expires_at(now)?;

    let mut cmd = redis::cmd("SET");
    cmd.arg(redis_key).arg(value);
    match options.expiration {
        Expiration::RelativeToNow(ttl) => {
            // expires_at guarantees at least one millisecond here.
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            cmd.arg("PX").arg(millis);
        }
        Expiration::At(_) => {
            cmd.arg("PXAT").arg(expires_at.timestamp_millis());
        }
    }
    Ok(cmd)
}

fn del_command(redis_key: &str) -> Cmd {
    let mut cmd = redis::cmd("DEL");
    cmd.arg(redis_key);
    cmd
}

#[async_trait]
impl DistributedStore for RedisStore {
    async fn get_string(&self, key: &str, cancel: &CancellationToken) -> Result<Option<String>> {
        let redis_key = self.instance_key(key);
        let mut conn = self.conn.clone();

        cancellable(cancel, async move {
            let value: Option<String> = get_command(&redis_key)
                .query_async(&mut conn)
                .await
                .map_err(|e| CacheError::Store(format!("Failed to get key '{}': {}", redis_key, e)))?;

            match &value {
                Some(_) => debug!("Redis hit for key '{}'", redis_key),
                None => debug!("Redis miss for key '{}'", redis_key),
            }
            Ok::<_, CacheError>(value)
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
        let redis_key = self.instance_key(key);
        // Validate before touching the network.
        let cmd = set_command(&redis_key, value, options, Utc::now())?;
        let expiration = options.expiration;

        let mut conn = self.conn.clone();
        cancellable(cancel, async move {
            let _: () = cmd.query_async(&mut conn).await.map_err(|e| {
                CacheError::Store(format!("Failed to set key '{}': {}", redis_key, e))
            })?;
            debug!("Stored key '{}' ({:?})", redis_key, expiration);
            Ok::<_, CacheError>(())
        })
        .await
    }

    async fn remove(&self, key: &str, cancel: &CancellationToken) -> Result<()> {
        let redis_key = self.instance_key(key);
        let mut conn = self.conn.clone();

        cancellable(cancel, async move {
            let deleted: i64 = del_command(&redis_key)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    CacheError::Store(format!("Failed to delete key '{}': {}", redis_key, e))
                })?;
            debug!("Deleted key '{}': {}", redis_key, deleted > 0);
            Ok::<_, CacheError>(())
        })
        .await
    }
}
