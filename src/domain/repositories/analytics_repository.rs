//! Analytics sink and aggregate query trait.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::entities::DataPoint;

/// Failures talking to the analytics backend.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("analytics write failed: {0}")]
    Write(String),
    #[error("analytics query failed: {0}")]
    Query(String),
}

/// Append-only store of analytics data points with an aggregate query surface.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Appends one data point, stamped with the ingestion time.
    async fn write(&self, point: DataPoint) -> Result<(), AnalyticsError>;

    /// Runs a fixed aggregate query template and returns its rows.
    ///
    /// Templates are parameter-free; callers only ever pass one of the
    /// statically known templates.
    async fn query(&self, template: &'static str) -> Result<Vec<Value>, AnalyticsError>;
}
