//! Fire-and-forget hand-off of analytics events to the background writer.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::entities::AnalyticsEvent;

/// Queues analytics events without ever blocking or failing the request.
///
/// Events are sent over a bounded channel to
/// [`run_analytics_worker`](crate::domain::analytics_worker::run_analytics_worker).
/// When the queue is full or the worker is gone the event is dropped.
#[derive(Clone)]
pub struct AnalyticsRecorder {
    sender: mpsc::Sender<AnalyticsEvent>,
}

impl AnalyticsRecorder {
    pub fn new(sender: mpsc::Sender<AnalyticsEvent>) -> Self {
        Self { sender }
    }

    pub fn record(&self, event: AnalyticsEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("gateway_analytics_events_total", "outcome" => "queued")
                    .increment(1);
            }
            Err(TrySendError::Full(event)) => {
                metrics::counter!("gateway_analytics_events_total", "outcome" => "dropped")
                    .increment(1);
                warn!(
                    event_type = %event.event_type,
                    path = %event.pathname,
                    "Analytics queue full, dropping event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("gateway_analytics_events_total", "outcome" => "closed")
                    .increment(1);
                warn!(
                    event_type = %event.event_type,
                    "Analytics worker stopped, dropping event"
                );
            }
        }
    }
}
