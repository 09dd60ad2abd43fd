//! Cache Module
//!
//! Typed distributed caching over Redis, with an in-memory store for local
//! runs and tests.

mod clock;
mod entry;
pub mod keys;
mod memory;
mod options;
mod redis_store;
mod service;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::StoredEntry;
pub use memory::MemoryStore;
pub use options::{CacheEntryOptions, Expiration, DEFAULT_EXPIRATION};
pub use redis_store::{prefixed_key, RedisStore};
pub use service::{Cache, CacheService, CacheValue};
pub use store::DistributedStore;
