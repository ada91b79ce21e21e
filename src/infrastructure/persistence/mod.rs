//! PostgreSQL persistence.
//!
//! # Repositories
//!
//! - [`PgAnalyticsRepository`] - Analytics data point sink and aggregate queries

pub mod pg_analytics_repository;

pub use pg_analytics_repository::PgAnalyticsRepository;
