//! Event subscribers and the dispatch loop that drives them.
//!
//! [`SubscriberSet`] owns every registered [`Subscriber`] and fans each
//! received [`ReportEvent`] out to all of them from a single background
//! task. A failing subscriber is logged and skipped; it never prevents the
//! other subscribers from seeing the event.

use std::sync::Arc;

use async_trait::async_trait;
use pawtrail_db::repositories::NotificationRepo;
use pawtrail_db::{DbError, DbPool};
use tokio::sync::broadcast;

use crate::bus::ReportEvent;

// ---------------------------------------------------------------------------
// Subscriber
// ---------------------------------------------------------------------------

/// A consumer of [`ReportEvent`]s.
///
/// Implementations are identified by [`kind`](Subscriber::kind); the
/// [`SubscriberSet`] uses that name to keep registration idempotent.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Stable name identifying this subscriber, e.g. `"notification-writer"`.
    fn kind(&self) -> &'static str;

    /// Handle a single event.
    async fn handle(&self, event: &ReportEvent) -> Result<(), DbError>;
}

// ---------------------------------------------------------------------------
// SubscriberSet
// ---------------------------------------------------------------------------

/// An ordered set of subscribers, keyed by [`Subscriber::kind`].
///
/// Registering two subscribers with the same kind keeps only the first, so
/// repeated wiring during startup cannot double-deliver events.
#[derive(Default)]
pub struct SubscriberSet {
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. A second registration under the same kind is
    /// ignored.
    pub fn register(&mut self, subscriber: Arc<dyn Subscriber>) {
        if self.subscribers.iter().any(|s| s.kind() == subscriber.kind()) {
            tracing::debug!(kind = subscriber.kind(), "Subscriber already registered");
            return;
        }
        self.subscribers.push(subscriber);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Run the dispatch loop.
    ///
    /// Receives events from the bus via `receiver` and hands each one to
    /// every registered subscriber in registration order. The loop exits
    /// when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<ReportEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    for subscriber in &self.subscribers {
                        if let Err(e) = subscriber.handle(&event).await {
                            tracing::error!(
                                error = %e,
                                kind = subscriber.kind(),
                                event_type = %event.event_type,
                                "Subscriber failed to handle event"
                            );
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event dispatch lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, dispatch shutting down");
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationWriter
// ---------------------------------------------------------------------------

/// Built-in subscriber that records report activity as `notifications` rows
/// for the post owner.
pub struct NotificationWriter {
    pool: DbPool,
}

/// Message written when a new report is filed.
const REPORT_CREATED_MESSAGE: &str = "New report submission";

/// Message written when a report is rewarded.
const REPORT_REWARDED_MESSAGE: &str = "Report rewarded";

impl NotificationWriter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Subscriber for NotificationWriter {
    fn kind(&self) -> &'static str {
        "notification-writer"
    }

    async fn handle(&self, event: &ReportEvent) -> Result<(), DbError> {
        let message = match event.event_type.as_str() {
            ReportEvent::CREATED => REPORT_CREATED_MESSAGE,
            ReportEvent::REWARDED => REPORT_REWARDED_MESSAGE,
            other => {
                tracing::debug!(event_type = other, "Ignoring event");
                return Ok(());
            }
        };

        NotificationRepo::create(&self.pool, event.post_id, event.report_id, message).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::bus::EventBus;

    struct Counting {
        kind: &'static str,
        seen: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Subscriber for Counting {
        fn kind(&self) -> &'static str {
            self.kind
        }

        async fn handle(&self, _event: &ReportEvent) -> Result<(), DbError> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DbError::Sqlx(sqlx::Error::RowNotFound));
            }
            Ok(())
        }
    }

    fn counting(kind: &'static str, fail: bool) -> (Arc<Counting>, Arc<AtomicUsize>) {
        let seen = Arc::new(AtomicUsize::new(0));
        let sub = Arc::new(Counting {
            kind,
            seen: seen.clone(),
            fail,
        });
        (sub, seen)
    }

    #[test]
    fn registration_is_idempotent_per_kind() {
        let mut set = SubscriberSet::new();
        let (a, _) = counting("writer", false);
        let (b, _) = counting("writer", false);
        let (c, _) = counting("other", false);

        set.register(a);
        set.register(b);
        set.register(c);

        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn failing_subscriber_does_not_block_others() {
        let bus = EventBus::default();
        let receiver = bus.subscribe();

        let (failing, failing_seen) = counting("failing", true);
        let (healthy, healthy_seen) = counting("healthy", false);

        let mut set = SubscriberSet::new();
        set.register(failing);
        set.register(healthy);
        let dispatch = tokio::spawn(set.run(receiver));

        bus.publish(ReportEvent::created(1, 1));
        bus.publish(ReportEvent::rewarded(1, 1));
        drop(bus);
        dispatch.await.expect("dispatch loop should exit cleanly");

        assert_eq!(failing_seen.load(Ordering::SeqCst), 2);
        assert_eq!(healthy_seen.load(Ordering::SeqCst), 2);
    }
}
