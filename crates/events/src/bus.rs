//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ReportEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use pawtrail_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ReportEvent
// ---------------------------------------------------------------------------

/// A domain event describing report activity on a post.
///
/// Constructed via [`ReportEvent::created`] or [`ReportEvent::rewarded`] and
/// optionally enriched with [`with_actor`](ReportEvent::with_actor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEvent {
    /// Dot-separated event name, e.g. `"report.created"`.
    pub event_type: String,

    /// The post the report belongs to.
    pub post_id: DbId,

    /// The report the event is about.
    pub report_id: DbId,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ReportEvent {
    /// Name of the event published when a new report is filed.
    pub const CREATED: &'static str = "report.created";

    /// Name of the event published when a report is rewarded.
    pub const REWARDED: &'static str = "report.rewarded";

    fn new(event_type: &str, post_id: DbId, report_id: DbId) -> Self {
        Self {
            event_type: event_type.to_string(),
            post_id,
            report_id,
            actor_user_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Event for a newly filed report.
    pub fn created(post_id: DbId, report_id: DbId) -> Self {
        Self::new(Self::CREATED, post_id, report_id)
    }

    /// Event for a report that was just rewarded.
    pub fn rewarded(post_id: DbId, report_id: DbId) -> Self {
        Self::new(Self::REWARDED, post_id, report_id)
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of receivers can
/// independently observe every published [`ReportEvent`].
///
/// # Usage
///
/// ```rust
/// use pawtrail_events::bus::{EventBus, ReportEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ReportEvent::created(1, 2));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ReportEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current receivers.
    ///
    /// Publishing never blocks request handling. If there are no active
    /// receivers the event is silently dropped.
    pub fn publish(&self, event: ReportEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ReportEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
