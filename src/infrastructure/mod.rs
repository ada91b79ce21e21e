//! Infrastructure layer for external integrations.
//!
//! This layer implements the collaborator traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`assets`] - Static asset serving (the passthrough collaborator)
//! - [`cache`] - Key-value stores (Redis and in-process implementations)
//! - [`persistence`] - PostgreSQL analytics sink and aggregate queries
//! - [`registry`] - HTTP client for the remote redirect registry

pub mod assets;
pub mod cache;
pub mod persistence;
pub mod registry;
