//! Per-request analytics event and its fixed-layout data point.
//!
//! Aggregate queries address fields by position (`blob1..blob4`,
//! `double1..double2`, `index1`), so the data point layout is fixed by the
//! array lengths below and must not change.

use std::fmt;
use std::time::Duration;

/// Classification of a handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    StaticRoot,
    StaticAsset,
    Redirect,
    RedirectFallback,
    NotFound,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaticRoot => "static_root",
            Self::StaticAsset => "static_asset",
            Self::Redirect => "redirect",
            Self::RedirectFallback => "redirect_fallback",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a redirect decision was served from the cached registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    NotApplicable,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::NotApplicable => "n/a",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Country label used when the edge did not report one.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// A single analytics event, recorded once per non-stats request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub event_type: EventType,
    pub method: String,
    pub country: String,
    pub cache_status: CacheStatus,
    pub status_code: u16,
    pub response_time: Duration,
    pub pathname: String,
}

impl AnalyticsEvent {
    /// Builds an event from the raw request path.
    ///
    /// The leading slash is stripped; the root path is recorded as `/`.
    /// A missing or empty country becomes [`UNKNOWN_COUNTRY`].
    pub fn new(
        event_type: EventType,
        method: impl Into<String>,
        country: Option<&str>,
        cache_status: CacheStatus,
        status_code: u16,
        response_time: Duration,
        path: &str,
    ) -> Self {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_COUNTRY)
            .to_string();

        Self {
            event_type,
            method: method.into(),
            country,
            cache_status,
            status_code,
            response_time,
            pathname: pathname_label(path),
        }
    }

    /// Flattens the event into its 4 label / 2 numeric / 1 index layout.
    pub fn to_data_point(&self) -> DataPoint {
        DataPoint {
            blobs: [
                self.event_type.as_str().to_string(),
                self.method.clone(),
                self.country.clone(),
                self.cache_status.as_str().to_string(),
            ],
            doubles: [
                f64::from(self.status_code),
                self.response_time.as_secs_f64() * 1000.0,
            ],
            indexes: [self.pathname.clone()],
        }
    }
}

/// The wire record written to the analytics sink.
///
/// `blobs`: event type, method, country, cache status.
/// `doubles`: status code, response time in milliseconds.
/// `indexes`: pathname.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub blobs: [String; 4],
    pub doubles: [f64; 2],
    pub indexes: [String; 1],
}

fn pathname_label(path: &str) -> String {
    match path {
        "" | "/" => "/".to_string(),
        other => other.strip_prefix('/').unwrap_or(other).to_string(),
    }
}
