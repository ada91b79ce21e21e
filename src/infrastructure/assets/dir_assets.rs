//! Directory-backed asset store.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::debug;

use super::AssetStore;

/// Serves files from a directory via `tower-http`'s [`ServeDir`].
///
/// `/` resolves to `index.html`; missing files produce a 404 response.
#[derive(Clone)]
pub struct DirAssetStore {
    service: ServeDir,
}

impl DirAssetStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            service: ServeDir::new(dir),
        }
    }
}

#[async_trait]
impl AssetStore for DirAssetStore {
    async fn fetch(&self, method: &Method, path: &str) -> Response {
        let request = match Request::builder()
            .method(method.clone())
            .uri(path)
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => {
                debug!(path, error = %e, "Unservable asset path");
                return StatusCode::NOT_FOUND.into_response();
            }
        };

        match self.service.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_site(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gateway-assets-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "home").unwrap();
        std::fs::write(dir.join("soy.webp"), "soy").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let store = DirAssetStore::new(temp_site("existing"));
        let response = store.fetch(&Method::GET, "/soy.webp").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let store = DirAssetStore::new(temp_site("root"));
        let response = store.fetch(&Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let store = DirAssetStore::new(temp_site("missing"));
        let response = store.fetch(&Method::GET, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
