//! Request helpers shared by the HTTP handlers.
//!
//! - [`client_country`] - Client country from edge headers

pub mod client_country;
