//! HTTP layer: request classification, handlers and middleware.
//!
//! # Modules
//!
//! - [`handlers`] - Gateway and stats handlers
//! - [`middleware`] - Request tracing

pub mod handlers;
pub mod middleware;
