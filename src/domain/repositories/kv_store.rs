//! Key-value store trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during key-value operations.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("key-value connection error: {0}")]
    Connection(String),
    #[error("key-value operation error: {0}")]
    Operation(String),
}

/// Result type for key-value operations.
pub type KvResult<T> = Result<T, KvError>;

/// TTL-bounded key-value store shared by every gateway instance.
///
/// Each operation is atomic on its own key. There are no cross-key
/// transactions.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisKvStore`] - Redis-backed store
/// - [`crate::infrastructure::cache::MemoryKvStore`] - In-process store for
///   single-node deployments and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads a value. Expired keys read as `None`.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Writes a value, replacing any existing one and resetting its TTL.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> KvResult<()>;

    /// Writes `value` under `key` only if the key is absent.
    ///
    /// Returns `true` when this caller now holds the key. Used as an advisory
    /// lock: the TTL bounds how long a crashed holder can block others, and a
    /// holder that stalls past its TTL may overlap with the next one.
    async fn try_acquire(&self, key: &str, value: &str, ttl: Duration) -> KvResult<bool>;

    /// Releases a key taken with [`KvStore::try_acquire`].
    async fn release(&self, key: &str) -> KvResult<()> {
        self.delete(key).await
    }

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
