//! Handler for the aggregate statistics API.

use axum::{
    Json,
    http::{Method, header},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Client cache hint for aggregate results.
pub const STATS_CACHE_CONTROL: &str = "public, max-age=30";

/// Returns the rows of a named aggregate.
///
/// # Endpoint
///
/// `GET /stats/api/{overview,traffic,paths,countries,cache}`
///
/// # Response Codes
///
/// - **200 OK**: JSON array of rows, cacheable for 30 seconds
/// - **404 Not Found**: unknown endpoint name
/// - **405 Method Not Allowed**: method other than GET/HEAD (`Allow: GET, HEAD`)
/// - **500 Internal Server Error**: aggregate store failure
///
/// No analytics event is recorded for these requests.
pub async fn stats_response(state: &AppState, name: &str, method: &Method) -> Response {
    match state.stats_service.handle(name, method).await {
        Ok(rows) => (
            [(header::CACHE_CONTROL, STATS_CACHE_CONTROL)],
            Json(rows),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
