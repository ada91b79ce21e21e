//! Cached snapshot of the redirect registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The registry cache entry persisted in the key-value store.
///
/// Stored as JSON: `{"redirects": ["slug", ...], "lastUpdated": "<RFC 3339>"}`.
/// An entry is always written whole; refreshes replace it, never merge into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectCacheEntry {
    pub redirects: BTreeSet<String>,
    pub last_updated: DateTime<Utc>,
}

impl RedirectCacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(redirects: BTreeSet<String>) -> Self {
        Self {
            redirects,
            last_updated: Utc::now(),
        }
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.redirects.contains(slug)
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }

    /// Serializes the entry into its stored JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a stored entry.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
