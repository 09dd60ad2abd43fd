//! Cache Entry Options Module
//!
//! Expiration policy attached to each write.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Expiration applied when a caller supplies no options.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest relative expiration a store can honour.
pub const MIN_RELATIVE_EXPIRATION: Duration = Duration::from_millis(1);

// == Expiration ==
/// When a stored entry stops being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Expire this long after the write
    RelativeToNow(Duration),
    /// Expire at a fixed wall-clock instant
    At(DateTime<Utc>),
}

// == Cache Entry Options ==
/// Options controlling how long a cache entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntryOptions {
    pub expiration: Expiration,
}

impl CacheEntryOptions {
    /// Expire `ttl` after the write.
    pub fn expire_after(ttl: Duration) -> Self {
        Self {
            expiration: Expiration::RelativeToNow(ttl),
        }
    }

    /// Expire at `instant`.
    pub fn expire_at(instant: DateTime<Utc>) -> Self {
        Self {
            expiration: Expiration::At(instant),
        }
    }

    // == Resolve ==
    /// Resolves the options to an absolute expiry instant for a write at `now`.
    ///
    /// Fails with [`CacheError::InvalidExpiration`] when the relative duration is
    /// zero or under a millisecond, or the absolute instant is not after `now`.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match self.expiration {
            Expiration::RelativeToNow(ttl) => {
                if ttl.is_zero() {
                    return Err(CacheError::InvalidExpiration(
                        "relative expiration must be positive".to_string(),
                    ));
                }
                // Redis expiry has millisecond resolution.
                if ttl < MIN_RELATIVE_EXPIRATION {
                    return Err(CacheError::InvalidExpiration(format!(
                        "relative expiration {:?} is below one millisecond",
                        ttl
                    )));
                }
                let ttl = chrono::Duration::from_std(ttl).map_err(|_| {
                    CacheError::InvalidExpiration(format!("relative expiration {:?} is too large", ttl))
                })?;
                now.checked_add_signed(ttl).ok_or_else(|| {
                    CacheError::InvalidExpiration("relative expiration overflows".to_string())
                })
            }
            Expiration::At(instant) => {
                if instant <= now {
                    return Err(CacheError::InvalidExpiration(format!(
                        "absolute expiration {} is not in the future",
                        instant.to_rfc3339()
                    )));
                }
                Ok(instant)
            }
        }
    }
}

impl Default for CacheEntryOptions {
    fn default() -> Self {
        Self::expire_after(DEFAULT_EXPIRATION)
    }
}
