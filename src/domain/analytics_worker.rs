//! Background writer for analytics events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::entities::{AnalyticsEvent, DataPoint};
use crate::domain::repositories::AnalyticsRepository;

const WRITE_ATTEMPTS: usize = 3;

/// Drains the analytics channel until every sender is dropped.
///
/// Each event is written on its own task, at most `concurrency` at a time.
/// Writes are retried with jittered exponential backoff and then dropped;
/// nothing is reported back to the request that produced the event.
/// Before returning, waits for in-flight writes to finish.
pub async fn run_analytics_worker(
    mut rx: mpsc::Receiver<AnalyticsEvent>,
    repository: Arc<dyn AnalyticsRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            write_with_retry(repository.as_ref(), event.to_data_point()).await;
        });
    }

    // Wait for in-flight writes.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Analytics worker stopped");
}

async fn write_with_retry(repository: &dyn AnalyticsRepository, point: DataPoint) {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(WRITE_ATTEMPTS - 1);

    match Retry::spawn(strategy, || repository.write(point.clone())).await {
        Ok(()) => debug!(event_type = %point.blobs[0], "Analytics event written"),
        Err(e) => {
            metrics::counter!("gateway_analytics_write_failures_total").increment(1);
            warn!(error = %e, event_type = %point.blobs[0], "Dropping analytics event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CacheStatus, EventType};
    use crate::domain::repositories::{AnalyticsError, MockAnalyticsRepository};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_event(path: &str) -> AnalyticsEvent {
        AnalyticsEvent::new(
            EventType::NotFound,
            "GET",
            Some("DE"),
            CacheStatus::Hit,
            404,
            Duration::from_millis(3),
            path,
        )
    }

    #[tokio::test]
    async fn test_worker_writes_every_event() {
        let mut mock_repo = MockAnalyticsRepository::new();
        mock_repo
            .expect_write()
            .withf(|point| point.blobs[0] == "not_found")
            .times(3)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(10);
        for path in ["/a", "/b", "/c"] {
            tx.send(sample_event(path)).await.unwrap();
        }
        drop(tx);

        run_analytics_worker(rx, Arc::new(mock_repo), 2).await;
    }

    #[tokio::test]
    async fn test_worker_retries_failed_writes() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut mock_repo = MockAnalyticsRepository::new();
        mock_repo.expect_write().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AnalyticsError::Write("connection reset".to_string()))
            } else {
                Ok(())
            }
        });

        let (tx, rx) = mpsc::channel(10);
        tx.send(sample_event("/retry")).await.unwrap();
        drop(tx);

        run_analytics_worker(rx, Arc::new(mock_repo), 1).await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_bounded_attempts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut mock_repo = MockAnalyticsRepository::new();
        mock_repo.expect_write().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AnalyticsError::Write("down".to_string()))
        });

        let (tx, rx) = mpsc::channel(10);
        tx.send(sample_event("/down")).await.unwrap();
        drop(tx);

        run_analytics_worker(rx, Arc::new(mock_repo), 1).await;

        assert_eq!(attempts.load(Ordering::SeqCst), WRITE_ATTEMPTS);
    }
}
