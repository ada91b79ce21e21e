#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_test::TestServer;
use redirect_gateway::application::services::{AnalyticsRecorder, RedirectCache, StatsService};
use redirect_gateway::config::RedirectSettings;
use redirect_gateway::domain::entities::{AnalyticsEvent, DataPoint, RedirectCacheEntry};
use redirect_gateway::domain::repositories::{
    AnalyticsError, AnalyticsRepository, KvStore, RegistryError, RegistrySource,
};
use redirect_gateway::infrastructure::assets::AssetStore;
use redirect_gateway::infrastructure::cache::MemoryKvStore;
use redirect_gateway::routes::app_router;
use redirect_gateway::state::AppState;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const NOT_FOUND_BODY: &str = "<h1>nothing here</h1>";

/// In-memory asset store keyed by path; records every fetch.
pub struct FakeAssets {
    files: HashMap<String, (String, Vec<(&'static str, &'static str)>)>,
    fetched: Mutex<Vec<(Method, String)>>,
}

impl FakeAssets {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// The default site: `/`, one stylesheet and the not-found page.
    pub fn site() -> Self {
        Self::new()
            .with("/", "<h1>home</h1>")
            .with("/style.css", "body {}")
            .with("/not-found.html", NOT_FOUND_BODY)
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), (body.to_string(), Vec::new()));
        self
    }

    pub fn with_headers(
        mut self,
        path: &str,
        body: &str,
        headers: Vec<(&'static str, &'static str)>,
    ) -> Self {
        self.files.insert(path.to_string(), (body.to_string(), headers));
        self
    }

    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    pub fn fetched_paths(&self) -> Vec<String> {
        self.fetched
            .lock()
            .unwrap()
            .iter()
            .map(|(_, path)| path.clone())
            .collect()
    }

    pub fn fetched(&self) -> Vec<(Method, String)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for FakeAssets {
    async fn fetch(&self, method: &Method, path: &str) -> Response {
        self.fetched
            .lock()
            .unwrap()
            .push((method.clone(), path.to_string()));

        match self.files.get(path) {
            Some((body, headers)) => {
                let mut builder = Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "text/html");
                for (name, value) in headers {
                    builder = builder.header(*name, *value);
                }
                builder
                    .body(Body::from(body.clone()))
                    .unwrap()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Registry that returns a fixed answer and counts fetches.
pub struct FakeRegistry {
    answer: Result<Vec<String>, u16>,
    calls: AtomicUsize,
}

impl FakeRegistry {
    pub fn ok(slugs: &[&str]) -> Self {
        Self {
            answer: Ok(slugs.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(503),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrySource for FakeRegistry {
    async fn fetch_redirects(&self) -> Result<BTreeSet<String>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(slugs) => Ok(slugs.iter().cloned().collect()),
            Err(status) => Err(RegistryError::Status(*status)),
        }
    }
}

/// Analytics repository that keeps written points and serves canned rows.
pub struct FakeAnalytics {
    rows: Result<Vec<Value>, String>,
    written: Mutex<Vec<DataPoint>>,
    queries: Mutex<Vec<&'static str>>,
}

impl FakeAnalytics {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: Ok(rows),
            written: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            rows: Err(reason.to_string()),
            written: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalyticsRepository for FakeAnalytics {
    async fn write(&self, point: DataPoint) -> Result<(), AnalyticsError> {
        self.written.lock().unwrap().push(point);
        Ok(())
    }

    async fn query(&self, template: &'static str) -> Result<Vec<Value>, AnalyticsError> {
        self.queries.lock().unwrap().push(template);
        self.rows.clone().map_err(AnalyticsError::Query)
    }
}

/// A gateway wired to fakes, with direct access to every collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryKvStore>,
    pub registry: Arc<FakeRegistry>,
    pub assets: Arc<FakeAssets>,
    pub analytics: Arc<FakeAnalytics>,
    events: mpsc::Receiver<AnalyticsEvent>,
}

impl TestApp {
    pub fn new(assets: FakeAssets, registry: FakeRegistry, analytics: FakeAnalytics) -> Self {
        let store = Arc::new(MemoryKvStore::new());
        let registry = Arc::new(registry);
        let assets = Arc::new(assets);
        let analytics = Arc::new(analytics);
        let (tx, events) = mpsc::channel(100);

        let state = AppState::new(
            RedirectCache::new(store.clone(), registry.clone(), RedirectSettings::default()),
            StatsService::new(analytics.clone()),
            AnalyticsRecorder::new(tx),
            assets.clone(),
        );

        let server = TestServer::new(app_router(state)).unwrap();

        Self {
            server,
            store,
            registry,
            assets,
            analytics,
            events,
        }
    }

    /// Default site, healthy registry with the given slugs, empty analytics.
    pub fn with_registry(slugs: &[&str]) -> Self {
        Self::new(
            FakeAssets::site(),
            FakeRegistry::ok(slugs),
            FakeAnalytics::with_rows(Vec::new()),
        )
    }

    /// Events recorded so far, in order.
    pub fn drain_events(&mut self) -> Vec<AnalyticsEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Pre-populates the registry cache as a previous refresh would have.
    pub async fn warm_cache(&self, slugs: &[&str]) {
        let entry = RedirectCacheEntry::new(slugs.iter().map(|s| s.to_string()).collect());
        self.store
            .put("redirects", &entry.to_json().unwrap(), Duration::from_secs(3600))
            .await
            .unwrap();
    }

    pub async fn cached_slugs(&self) -> Option<BTreeSet<String>> {
        self.store
            .get("redirects")
            .await
            .unwrap()
            .map(|raw| RedirectCacheEntry::from_json(&raw).unwrap().redirects)
    }
}
