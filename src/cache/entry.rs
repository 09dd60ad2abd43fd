//! Stored Entry Module
//!
//! A serialized value held by the in-memory store together with its expiry.

use chrono::{DateTime, Utc};

// == Stored Entry ==
/// Represents a single entry held by [`MemoryStore`](super::MemoryStore).
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Serialized payload
    pub value: String,
    /// Instant the entry was written
    pub created_at: DateTime<Utc>,
    /// Instant after which the entry is gone
    pub expires_at: DateTime<Utc>,
}

impl StoredEntry {
    pub fn new(value: String, created_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime at `now`, zero once expired.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> chrono::Duration {
        if self.is_expired(now) {
            chrono::Duration::zero()
        } else {
            self.expires_at - now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_not_expired_before_deadline() {
        let entry = StoredEntry::new("v".into(), start(), start() + chrono::Duration::seconds(10));
        assert!(!entry.is_expired(start() + chrono::Duration::seconds(9)));
        assert_eq!(
            entry.ttl_remaining(start() + chrono::Duration::seconds(4)),
            chrono::Duration::seconds(6)
        );
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let deadline = start() + chrono::Duration::seconds(10);
        let entry = StoredEntry::new("v".into(), start(), deadline);

        assert!(entry.is_expired(deadline), "Entry should be expired at boundary");
        assert_eq!(entry.ttl_remaining(deadline), chrono::Duration::zero());
    }
}
