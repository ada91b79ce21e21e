//! Domain layer containing the gateway's entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Registry cache entry, analytics event, resolution outcome
//! - [`repositories`] - Trait contracts for the key-value store, remote
//!   registry and analytics backend
//! - [`analytics_worker`] - Background writer draining recorded analytics events
//!
//! # Analytics Flow
//!
//! 1. The request router finishes a response
//! 2. An [`entities::AnalyticsEvent`] is handed to the recorder (non-blocking)
//! 3. [`analytics_worker::run_analytics_worker`] writes it with bounded concurrency
//! 4. The data point lands in the [`repositories::AnalyticsRepository`]

pub mod analytics_worker;
pub mod entities;
pub mod repositories;
