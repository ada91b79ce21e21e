//! Collaborator trait definitions for the domain layer.
//!
//! Every external system the gateway talks to is reached through one of these
//! traits. Concrete implementations live in `crate::infrastructure`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Collaborators
//!
//! - [`KvStore`] - TTL-bounded key-value store holding the registry cache and refresh lock
//! - [`RegistrySource`] - Remote authoritative list of redirect slugs
//! - [`AnalyticsRepository`] - Analytics sink and aggregate query endpoint

pub mod analytics_repository;
pub mod kv_store;
pub mod registry_source;

pub use analytics_repository::{AnalyticsError, AnalyticsRepository};
pub use kv_store::{KvError, KvResult, KvStore};
pub use registry_source::{RegistryError, RegistrySource};

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use kv_store::MockKvStore;
#[cfg(test)]
pub use registry_source::MockRegistrySource;
