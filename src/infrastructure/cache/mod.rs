//! Key-value stores backing the registry cache and refresh lock.
//!
//! Provides two [`KvStore`](crate::domain::repositories::KvStore) implementations:
//! - [`RedisKvStore`] - Production Redis-backed store shared across instances
//! - [`MemoryKvStore`] - In-process store for single-node runs and tests

mod memory_store;
mod redis_store;

pub use memory_store::MemoryKvStore;
pub use redis_store::RedisKvStore;
