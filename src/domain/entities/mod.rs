//! Core domain entities representing the gateway's data model.
//!
//! Entities are plain data structures. The only logic they carry is the
//! conversion between their in-memory and persisted/wire shapes.
//!
//! # Entity Types
//!
//! - [`RedirectCacheEntry`] - Cached snapshot of the remote redirect registry
//! - [`AnalyticsEvent`] - One per handled request, flattened into a [`DataPoint`]
//! - [`Resolution`] - Outcome of checking a slug against the registry cache

pub mod analytics_event;
pub mod redirect_entry;
pub mod resolution;

pub use analytics_event::{AnalyticsEvent, CacheStatus, DataPoint, EventType};
pub use redirect_entry::RedirectCacheEntry;
pub use resolution::{Decision, Resolution};
