//! Cache-aside resolution of redirect slugs with lock-guarded refresh-ahead.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::RedirectSettings;
use crate::domain::entities::{Decision, RedirectCacheEntry, Resolution};
use crate::domain::repositories::{KvStore, RegistrySource};

/// Result of one [`RedirectCache::refresh_with_lock`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cache entry was replaced with this many slugs.
    Refreshed(usize),
    /// Another refresh holds the lock.
    Skipped,
    /// The lock was taken but the registry could not produce a usable set,
    /// or the lock itself could not be taken.
    Failed,
}

/// Decides whether a slug is a known redirect, keeping a snapshot of the
/// remote registry in the shared key-value store.
///
/// Resolution never fails: store and registry errors degrade to a miss and
/// then to an optimistic [`Decision::FallbackRedirect`].
///
/// # Cache Strategy
///
/// - **Hit**: answer from the snapshot, then refresh it in the background
///   (at most one refresh in flight, guarded by an advisory lock key)
/// - **Miss**: fetch the registry synchronously and store the new snapshot
/// - **Registry unavailable or empty**: fallback redirect, nothing stored
#[derive(Clone)]
pub struct RedirectCache {
    store: Arc<dyn KvStore>,
    registry: Arc<dyn RegistrySource>,
    settings: Arc<RedirectSettings>,
}

impl RedirectCache {
    pub fn new(
        store: Arc<dyn KvStore>,
        registry: Arc<dyn RegistrySource>,
        settings: RedirectSettings,
    ) -> Self {
        Self {
            store,
            registry,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &RedirectSettings {
        &self.settings
    }

    /// Resolves a slug to a redirect decision.
    ///
    /// On a hit the background refresh is detached from the caller: it keeps
    /// running if the request that triggered it goes away.
    pub async fn resolve(&self, slug: &str) -> Resolution {
        if let Some(entry) = self.read_entry().await {
            debug!(slug, "Registry cache HIT");
            self.spawn_refresh();
            return Resolution::hit(decide(&entry, slug));
        }

        debug!(slug, "Registry cache MISS");

        match self.fetch_usable().await {
            Some(redirects) => {
                let entry = RedirectCacheEntry::new(redirects);
                self.write_entry(&entry).await;
                Resolution::miss(decide(&entry, slug))
            }
            None => {
                info!(slug, "Registry unavailable, issuing fallback redirect");
                Resolution::miss(Decision::FallbackRedirect)
            }
        }
    }

    /// Refreshes the cached snapshot unless another refresh holds the lock.
    ///
    /// The lock is released whether the refresh succeeds, fails, or panics.
    /// A failed release is logged and left to the lock's TTL.
    pub async fn refresh_with_lock(&self) -> RefreshOutcome {
        let lock_key = self.settings.lock_key.as_str();
        let token = Utc::now().to_rfc3339();

        match self
            .store
            .try_acquire(lock_key, &token, self.settings.lock_ttl)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                debug!("Registry refresh already in flight, skipping");
                metrics::counter!("gateway_registry_refresh_skipped_total").increment(1);
                return RefreshOutcome::Skipped;
            }
            Err(e) => {
                warn!(error = %e, "Could not take registry refresh lock");
                return RefreshOutcome::Failed;
            }
        }

        // Run the refresh on its own task so a panic surfaces as a join error
        // instead of skipping the release below.
        let cache = self.clone();
        let outcome = match tokio::spawn(async move { cache.refresh_entry().await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Registry refresh task aborted");
                RefreshOutcome::Failed
            }
        };

        if let Err(e) = self.store.release(lock_key).await {
            metrics::counter!("gateway_registry_lock_release_failures_total").increment(1);
            warn!(
                error = %e,
                ttl_secs = self.settings.lock_ttl.as_secs(),
                "Failed to release registry refresh lock; it will expire on its own"
            );
        }

        outcome
    }

    fn spawn_refresh(&self) {
        let cache = self.clone();
        tokio::spawn(
            async move {
                let outcome = cache.refresh_with_lock().await;
                debug!(?outcome, "Background registry refresh finished");
            }
            .instrument(info_span!("registry_refresh")),
        );
    }

    async fn refresh_entry(&self) -> RefreshOutcome {
        match self.fetch_usable().await {
            Some(redirects) => {
                let count = redirects.len();
                if self.write_entry(&RedirectCacheEntry::new(redirects)).await {
                    info!(count, "Registry cache refreshed");
                    RefreshOutcome::Refreshed(count)
                } else {
                    RefreshOutcome::Failed
                }
            }
            None => RefreshOutcome::Failed,
        }
    }

    /// Reads the snapshot; unreadable, corrupt or empty entries count as a miss.
    async fn read_entry(&self) -> Option<RedirectCacheEntry> {
        let key = self.settings.cache_key.as_str();

        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Registry cache read failed");
                return None;
            }
        };

        match RedirectCacheEntry::from_json(&raw) {
            Ok(entry) if !entry.is_empty() => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Discarding malformed registry cache entry");
                None
            }
        }
    }

    /// Stores a snapshot, replacing the previous one and resetting its TTL.
    async fn write_entry(&self, entry: &RedirectCacheEntry) -> bool {
        let raw = match entry.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Failed to serialize registry cache entry");
                return false;
            }
        };

        match self
            .store
            .put(&self.settings.cache_key, &raw, self.settings.cache_ttl)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to store registry cache entry");
                false
            }
        }
    }

    /// Fetches the registry; an empty set is treated like a failed fetch.
    async fn fetch_usable(&self) -> Option<BTreeSet<String>> {
        match self.registry.fetch_redirects().await {
            Ok(redirects) if !redirects.is_empty() => {
                metrics::counter!("gateway_registry_fetches_total", "outcome" => "ok").increment(1);
                Some(redirects)
            }
            Ok(_) => {
                metrics::counter!("gateway_registry_fetches_total", "outcome" => "empty")
                    .increment(1);
                warn!("Registry returned an empty redirect list");
                None
            }
            Err(e) => {
                metrics::counter!("gateway_registry_fetches_total", "outcome" => "error")
                    .increment(1);
                warn!(error = %e, "Registry fetch failed");
                None
            }
        }
    }
}

fn decide(entry: &RedirectCacheEntry, slug: &str) -> Decision {
    if entry.contains(slug) {
        Decision::Redirect
    } else {
        Decision::NotFound
    }
}
