//! Remote redirect registry trait.

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

/// Reasons a registry fetch did not produce a usable slug set.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Transport(String),
    #[error("registry responded with status {0}")]
    Status(u16),
    #[error("registry payload rejected: {0}")]
    Payload(String),
}

/// Source of truth for the set of valid redirect slugs.
///
/// Stateless I/O boundary: every call performs one remote fetch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetches the full, deduplicated slug set.
    ///
    /// # Errors
    ///
    /// Any network failure, non-success status or payload that is not
    /// `{result: {redirects: [string]}}` is an error.
    async fn fetch_redirects(&self) -> Result<BTreeSet<String>, RegistryError>;
}
