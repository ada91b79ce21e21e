//! HTTP request handlers.

pub mod gateway;
pub mod stats;

pub use gateway::gateway_handler;
pub use stats::stats_response;
