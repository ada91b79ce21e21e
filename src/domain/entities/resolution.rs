//! Outcome of resolving a slug against the registry cache.

use super::analytics_event::CacheStatus;

/// What the gateway should do with a redirect candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Slug is a known registry entry.
    Redirect,
    /// Registry was consulted and does not contain the slug.
    NotFound,
    /// Registry could not be consulted; redirect optimistically and let the
    /// canonical service reject unknown slugs.
    FallbackRedirect,
}

/// Result of [`crate::application::services::RedirectCache::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub decision: Decision,
    pub cache_status: CacheStatus,
}

impl Resolution {
    pub fn hit(decision: Decision) -> Self {
        Self {
            decision,
            cache_status: CacheStatus::Hit,
        }
    }

    pub fn miss(decision: Decision) -> Self {
        Self {
            decision,
            cache_status: CacheStatus::Miss,
        }
    }

    /// Whether the response should be a 301.
    pub fn is_redirect(&self) -> bool {
        matches!(
            self.decision,
            Decision::Redirect | Decision::FallbackRedirect
        )
    }
}
