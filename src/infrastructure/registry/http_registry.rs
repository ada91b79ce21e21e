//! HTTP implementation of [`RegistrySource`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::repositories::{RegistryError, RegistrySource};

#[derive(Deserialize)]
struct RegistryEnvelope {
    result: RegistryResult,
}

#[derive(Deserialize)]
struct RegistryResult {
    redirects: Vec<String>,
}

/// Decodes a registry response body into a deduplicated slug set.
///
/// Only `{"result": {"redirects": ["...", ...]}}` is accepted; other fields in
/// the envelope are ignored. A missing `redirects` array, a non-array value or
/// any non-string element rejects the whole payload.
///
/// An empty array decodes successfully; whether that is usable is the cache's
/// decision.
pub fn decode_registry_payload(body: &[u8]) -> Result<BTreeSet<String>, RegistryError> {
    let envelope: RegistryEnvelope =
        serde_json::from_slice(body).map_err(|e| RegistryError::Payload(e.to_string()))?;

    Ok(envelope.result.redirects.into_iter().collect())
}

/// Fetches the registry over HTTP(S).
#[derive(Clone)]
pub struct HttpRegistrySource {
    client: Client,
    url: String,
}

impl HttpRegistrySource {
    /// Builds a client with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RegistrySource for HttpRegistrySource {
    async fn fetch_redirects(&self) -> Result<BTreeSet<String>, RegistryError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                url = %self.url,
                "Registry returned non-success status"
            );
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let redirects = decode_registry_payload(&body)?;
        debug!(count = redirects.len(), "Fetched redirect registry");

        Ok(redirects)
    }
}
