//! Static asset collaborator.
//!
//! The gateway never interprets asset content: it forwards the request and
//! treats the returned status as meaningful, including 404.

mod dir_assets;

pub use dir_assets::DirAssetStore;

use async_trait::async_trait;
use axum::http::Method;
use axum::response::Response;

/// Serves static content for a request path.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns the asset response for `path`, with whatever status the store
    /// chose (404 when there is no such asset).
    async fn fetch(&self, method: &Method, path: &str) -> Response;
}
