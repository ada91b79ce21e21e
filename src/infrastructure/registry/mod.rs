//! Remote redirect registry client.

mod http_registry;

pub use http_registry::{HttpRegistrySource, decode_registry_payload};
