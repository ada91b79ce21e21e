//! Read-only aggregate statistics over recorded analytics events.

use std::sync::Arc;

use axum::http::Method;
use serde_json::{Value, json};
use tracing::error;

use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// The fixed set of aggregate endpoints served under `/stats/api/`.
///
/// Every template covers the trailing 24 hours and weights each row by its
/// `sample_interval`, so counts stay correct if the sink ever samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsEndpoint {
    Overview,
    Traffic,
    Paths,
    Countries,
    Cache,
}

impl StatsEndpoint {
    pub const ALL: [StatsEndpoint; 5] = [
        Self::Overview,
        Self::Traffic,
        Self::Paths,
        Self::Countries,
        Self::Cache,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "overview" => Some(Self::Overview),
            "traffic" => Some(Self::Traffic),
            "paths" => Some(Self::Paths),
            "countries" => Some(Self::Countries),
            "cache" => Some(Self::Cache),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Traffic => "traffic",
            Self::Paths => "paths",
            Self::Countries => "countries",
            Self::Cache => "cache",
        }
    }

    /// The parameter-free query behind this endpoint.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Overview => {
                r#"
                SELECT
                    COALESCE(SUM(sample_interval), 0) AS total_requests,
                    COALESCE(SUM(sample_interval) FILTER (
                        WHERE blob1 IN ('redirect', 'redirect_fallback')
                    ), 0) AS redirects,
                    COALESCE(SUM(sample_interval) FILTER (
                        WHERE blob1 = 'not_found'
                    ), 0) AS not_found,
                    COALESCE(SUM(sample_interval) FILTER (
                        WHERE blob1 IN ('static_root', 'static_asset')
                    ), 0) AS static_served,
                    SUM(double2 * sample_interval)
                        / NULLIF(SUM(sample_interval), 0) AS avg_response_time
                FROM analytics_events
                WHERE timestamp > NOW() - INTERVAL '24 hours'
                "#
            }
            Self::Traffic => {
                r#"
                SELECT
                    date_trunc('hour', timestamp) AS hour,
                    blob1 AS event_type,
                    SUM(sample_interval) AS requests
                FROM analytics_events
                WHERE timestamp > NOW() - INTERVAL '24 hours'
                GROUP BY hour, event_type
                ORDER BY hour, event_type
                "#
            }
            Self::Paths => {
                r#"
                SELECT
                    index1 AS path,
                    blob1 AS event_type,
                    SUM(sample_interval) AS hits,
                    SUM(double2 * sample_interval)
                        / NULLIF(SUM(sample_interval), 0) AS avg_response_time
                FROM analytics_events
                WHERE timestamp > NOW() - INTERVAL '24 hours'
                GROUP BY path, event_type
                ORDER BY hits DESC
                LIMIT 20
                "#
            }
            Self::Countries => {
                r#"
                SELECT
                    blob3 AS country,
                    SUM(sample_interval) AS requests
                FROM analytics_events
                WHERE timestamp > NOW() - INTERVAL '24 hours'
                  AND blob3 <> 'unknown'
                GROUP BY country
                ORDER BY requests DESC
                LIMIT 15
                "#
            }
            Self::Cache => {
                r#"
                SELECT
                    blob4 AS cache_status,
                    SUM(sample_interval) AS requests
                FROM analytics_events
                WHERE timestamp > NOW() - INTERVAL '24 hours'
                  AND blob4 <> 'n/a'
                GROUP BY cache_status
                ORDER BY requests DESC
                "#
            }
        }
    }
}

/// Maps stats endpoint names to aggregate queries.
#[derive(Clone)]
pub struct StatsService {
    repository: Arc<dyn AnalyticsRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repository }
    }

    /// Runs the named aggregate and returns its rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MethodNotAllowed`] for anything but GET and HEAD.
    /// Returns [`AppError::NotFound`] if the name is not a known endpoint.
    /// Returns [`AppError::Internal`] if the aggregate store fails; the cause
    /// is logged, not returned.
    pub async fn handle(&self, name: &str, method: &Method) -> Result<Vec<Value>, AppError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(AppError::method_not_allowed(method.as_str()));
        }

        let endpoint = StatsEndpoint::from_name(name).ok_or_else(|| {
            AppError::not_found("Unknown stats endpoint", json!({ "endpoint": name }))
        })?;

        self.repository
            .query(endpoint.template())
            .await
            .map_err(|e| {
                error!(endpoint = endpoint.name(), error = %e, "Stats query failed");
                AppError::internal("Failed to query statistics", json!({}))
            })
    }
}
