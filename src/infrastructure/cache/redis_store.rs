//! Redis-backed key-value store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::repositories::{KvError, KvResult, KvStore};

/// Redis key-value store.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Unlike a read-through URL cache, errors are returned to the caller: the
/// registry cache decides how to degrade, and lock release failures must be
/// observable.
pub struct RedisKvStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisKvStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> KvResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| KvError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| KvError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| KvError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "gateway:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn op_error(op: &str, key: &str, e: redis::RedisError) -> KvError {
    KvError::Operation(format!("Redis {} failed for {}: {}", op, key, e))
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(&full_key)
            .await
            .map_err(|e| op_error("GET", key, e))?;

        debug!(key, found = value.is_some(), "Redis GET");
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds(ttl);

        conn.set_ex::<_, _, ()>(&full_key, value, ttl)
            .await
            .map_err(|e| op_error("SET", key, e))?;

        debug!(key, ttl, "Redis SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.del::<_, i32>(&full_key)
            .await
            .map_err(|e| op_error("DEL", key, e))?;

        debug!(key, "Redis DEL");
        Ok(())
    }

    async fn try_acquire(&self, key: &str, value: &str, ttl: Duration) -> KvResult<bool> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        // SET NX EX replies OK when written and nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| op_error("SET NX", key, e))?;

        let acquired = reply.is_some();
        debug!(key, acquired, "Redis SET NX");
        Ok(acquired)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
