//! # Redirect Gateway
//!
//! An edge redirect gateway built with Axum. It serves a static site, answers
//! `/{slug}` with a permanent redirect to the canonical `/go/{slug}` URL when
//! the slug is in the remote redirect registry, and records one analytics
//! event per request.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Analytics events, cache entries and collaborator traits
//! - **Application Layer** ([`application`]) - Registry cache, analytics recorder, stats queries
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis/in-process store,
//!   registry client, PostgreSQL sink, static assets
//! - **API Layer** ([`api`]) - Request classification and handlers
//!
//! ## Features
//!
//! - Cache-aside registry snapshot with lock-guarded refresh-ahead
//! - Optimistic fallback redirect when the registry is unreachable
//! - Fire-and-forget analytics with bounded queue and retrying writer
//! - Read-only aggregate statistics under `/stats/api/`
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AnalyticsRecorder, RedirectCache, StatsService};
    pub use crate::config::RedirectSettings;
    pub use crate::domain::entities::{AnalyticsEvent, CacheStatus, DataPoint, Decision, EventType};
    pub use crate::error::AppError;
    pub use crate::infrastructure::assets::AssetStore;
    pub use crate::routes::app_router;
    pub use crate::state::AppState;
}
