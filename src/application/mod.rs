//! Application layer services implementing the gateway's behavior.
//!
//! Services consume repository traits and give the HTTP layer an API that
//! never needs to know which store, registry or sink is behind it.
//!
//! # Available Services
//!
//! - [`services::redirect_cache::RedirectCache`] - Slug resolution with refresh-ahead caching
//! - [`services::analytics_recorder::AnalyticsRecorder`] - Non-blocking event hand-off
//! - [`services::stats_service::StatsService`] - Named aggregate queries

pub mod services;
