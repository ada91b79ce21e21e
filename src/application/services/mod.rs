//! Business logic services for the application layer.

pub mod analytics_recorder;
pub mod redirect_cache;
pub mod stats_service;

pub use analytics_recorder::AnalyticsRecorder;
pub use redirect_cache::{RedirectCache, RefreshOutcome};
pub use stats_service::{StatsEndpoint, StatsService};
