//! PostgreSQL implementation of the analytics repository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::DataPoint;
use crate::domain::repositories::{AnalyticsError, AnalyticsRepository};

/// PostgreSQL repository for analytics data points.
///
/// Rows land in `analytics_events`, one column per data point position.
/// Aggregate templates are wrapped in `json_agg` so each query returns its
/// rows as a single JSON array regardless of the template's column set.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn wrap_template(template: &str) -> String {
    format!(
        "SELECT COALESCE(json_agg(t), '[]'::json) FROM ({}) AS t",
        template.trim().trim_end_matches(';')
    )
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn write(&self, point: DataPoint) -> Result<(), AnalyticsError> {
        let DataPoint {
            blobs: [event_type, method, country, cache_status],
            doubles: [status_code, response_time_ms],
            indexes: [pathname],
        } = point;

        sqlx::query(
            r#"
            INSERT INTO analytics_events (blob1, blob2, blob3, blob4, double1, double2, index1)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event_type)
        .bind(method)
        .bind(country)
        .bind(cache_status)
        .bind(status_code)
        .bind(response_time_ms)
        .bind(pathname)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| AnalyticsError::Write(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, template: &'static str) -> Result<Vec<Value>, AnalyticsError> {
        let sql = wrap_template(template);

        let rows: Value = sqlx::query_scalar(&sql)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| AnalyticsError::Query(e.to_string()))?;

        match rows {
            Value::Array(rows) => Ok(rows),
            other => Err(AnalyticsError::Query(format!(
                "expected a JSON array, got {}",
                other
            ))),
        }
    }
}
