//! Top-level router configuration.
//!
//! # Route Structure
//!
//! Every request goes through one fallback handler,
//! [`gateway_handler`](crate::api::handlers::gateway_handler), which
//! classifies it in a fixed order:
//!
//! - `/`                 - Static site root
//! - `/stats/api/{name}` - Aggregate statistics (GET, HEAD)
//! - `/{asset}`          - Static asset, when one exists (GET, HEAD)
//! - `/{slug}`           - 301 to the canonical host, or the not-found page
//!
//! The asset-versus-slug split depends on the asset store's answer, so it
//! cannot be expressed as axum routes.

use crate::api::handlers::gateway_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;

/// Constructs the application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .fallback(gateway_handler)
        .with_state(state)
        .layer(tracing::layer())
}
