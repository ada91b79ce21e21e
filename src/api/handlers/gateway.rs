//! Catch-all gateway handler: static content, stats API and redirect checks.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{debug, warn};

use crate::api::handlers::stats::stats_response;
use crate::domain::entities::{AnalyticsEvent, CacheStatus, Decision, EventType};
use crate::state::AppState;
use crate::utils::client_country::client_country;

/// Debug header carrying the registry cache outcome of a redirect check.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache-status");

const STATS_API_PREFIX: &str = "/stats/api/";
const NOT_FOUND_FALLBACK_BODY: &str = "404 - Page Not Found";

/// First-pass classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind<'a> {
    /// `/` or empty: the static site root.
    Root,
    /// `/stats/api/{name}`.
    StatsApi(&'a str),
    /// Anything else: a static asset if one exists, otherwise a redirect slug
    /// (the path without its leading `/`).
    Candidate(&'a str),
}

pub fn classify(path: &str) -> RequestKind<'_> {
    if path.is_empty() || path == "/" {
        return RequestKind::Root;
    }

    if let Some(name) = path.strip_prefix(STATS_API_PREFIX) {
        return RequestKind::StatsApi(name);
    }

    RequestKind::Candidate(path.strip_prefix('/').unwrap_or(path))
}

/// Handles every request the gateway receives.
///
/// # Request Flow
///
/// 1. `/` is served from the asset store (`static_root`)
/// 2. `/stats/api/{name}` goes to the stats service; no analytics event
/// 3. GET/HEAD for an existing asset serves it (`static_asset`)
/// 4. Anything else is a slug: resolved against the registry cache, then
///    either a 301 to the canonical `/go/{slug}` URL or the not-found page
///
/// Every branch except the stats API records exactly one analytics event
/// with the final status and the latency measured from entry.
///
/// # Response Codes
///
/// - **301 Moved Permanently**: known slug, or registry unavailable
/// - **404 Not Found**: registry consulted and slug unknown
/// - Static branches pass the asset store's status through
pub async fn gateway_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let path = uri.path();

    let (response, event_type, cache_status) = match classify(path) {
        RequestKind::StatsApi(name) => return stats_response(&state, name, &method).await,
        RequestKind::Root => {
            let response = state.assets.fetch(&method, path).await;
            (response, EventType::StaticRoot, CacheStatus::NotApplicable)
        }
        RequestKind::Candidate(slug) => {
            match serve_existing_asset(&state, &method, path).await {
                Some(response) => (response, EventType::StaticAsset, CacheStatus::NotApplicable),
                None => redirect_check(&state, &method, slug).await,
            }
        }
    };

    state.recorder.record(AnalyticsEvent::new(
        event_type,
        method.as_str(),
        client_country(&headers),
        cache_status,
        response.status().as_u16(),
        started.elapsed(),
        path,
    ));

    response
}

async fn serve_existing_asset(state: &AppState, method: &Method, path: &str) -> Option<Response> {
    if method != Method::GET && method != Method::HEAD {
        return None;
    }

    let response = state.assets.fetch(method, path).await;
    (response.status() != StatusCode::NOT_FOUND).then_some(response)
}

async fn redirect_check(
    state: &AppState,
    method: &Method,
    slug: &str,
) -> (Response, EventType, CacheStatus) {
    let resolution = state.redirect_cache.resolve(slug).await;
    debug!(slug, ?resolution, "Redirect check");

    let redirect = if resolution.is_redirect() {
        permanent_redirect(&state.settings().redirect_target(slug))
    } else {
        None
    };

    let (mut response, event_type) = match redirect {
        Some(response) if resolution.decision == Decision::FallbackRedirect => {
            (response, EventType::RedirectFallback)
        }
        Some(response) => (response, EventType::Redirect),
        None => (not_found_page(state, method).await, EventType::NotFound),
    };

    response.headers_mut().insert(
        CACHE_STATUS_HEADER,
        HeaderValue::from_static(resolution.cache_status.as_str()),
    );

    (response, event_type, resolution.cache_status)
}

/// Builds a 301; `None` if the target is not a valid header value.
fn permanent_redirect(target: &str) -> Option<Response> {
    let location = match HeaderValue::from_str(target) {
        Ok(location) => location,
        Err(e) => {
            warn!(target, error = %e, "Redirect target is not a valid Location");
            return None;
        }
    };

    let mut response = StatusCode::MOVED_PERMANENTLY.into_response();
    response.headers_mut().insert(header::LOCATION, location);
    Some(response)
}

/// Serves the not-found asset as a 404, or plain text if it is unavailable.
async fn not_found_page(state: &AppState, method: &Method) -> Response {
    let page_method = if method == Method::HEAD {
        Method::HEAD
    } else {
        Method::GET
    };

    let mut response = state
        .assets
        .fetch(&page_method, &state.settings().not_found_page)
        .await;

    if !response.status().is_success() {
        warn!(
            page = %state.settings().not_found_page,
            status = response.status().as_u16(),
            "Not-found page unavailable, using plain text"
        );
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            NOT_FOUND_FALLBACK_BODY,
        )
            .into_response();
    }

    *response.status_mut() = StatusCode::NOT_FOUND;
    response.headers_mut().remove(header::LOCATION);
    response
}
