//! In-process key-value store with per-entry expiry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::repositories::{KvResult, KvStore};

struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// A [`KvStore`] that keeps entries in process memory.
///
/// Used when Redis is not configured or unreachable at startup, and in tests.
/// State is not shared between gateway instances, so the refresh lock only
/// deduplicates refreshes within this process.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, StoredValue>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        debug!("Using in-process key-value store");
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|stored| stored.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(stored) if stored.is_live(now) => Ok(Some(stored.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()> {
        let stored = StoredValue {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.insert(key.to_string(), stored);
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn try_acquire(&self, key: &str, value: &str, ttl: Duration) -> KvResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        if entries.get(key).is_some_and(|stored| stored.is_live(now)) {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
