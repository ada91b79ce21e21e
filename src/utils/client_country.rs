//! Client country extraction from edge-provided request headers.

use axum::http::HeaderMap;

/// Header set by the edge proxy with the client's ISO country code.
pub const COUNTRY_HEADER: &str = "cf-ipcountry";

/// Reads the client country from the request headers.
///
/// Returns `None` if the header is missing, not valid UTF-8, blank, or one
/// of the placeholder codes the edge uses when it could not tell (`XX`, `T1`
/// for Tor exits).
pub fn client_country(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(COUNTRY_HEADER)?.to_str().ok()?.trim();

    match value {
        "" | "XX" | "T1" => None,
        code => Some(code),
    }
}
