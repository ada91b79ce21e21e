//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::{AnalyticsRecorder, RedirectCache, StatsService};
use crate::config::RedirectSettings;
use crate::infrastructure::assets::AssetStore;

/// Services and collaborators available to every request.
///
/// Cloned into each request; everything inside is either an `Arc` or a cheap
/// channel handle.
#[derive(Clone)]
pub struct AppState {
    pub redirect_cache: RedirectCache,
    pub stats_service: StatsService,
    pub recorder: AnalyticsRecorder,
    pub assets: Arc<dyn AssetStore>,
}

impl AppState {
    pub fn new(
        redirect_cache: RedirectCache,
        stats_service: StatsService,
        recorder: AnalyticsRecorder,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            redirect_cache,
            stats_service,
            recorder,
            assets,
        }
    }

    pub fn settings(&self) -> &RedirectSettings {
        self.redirect_cache.settings()
    }
}
