//! Pawtrail event bus and notification infrastructure.
//!
//! This crate provides the in-process event system that decouples report
//! activity from its side effects:
//!
//! - [`EventBus`] — publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`ReportEvent`] — the canonical domain event envelope.
//! - [`SubscriberSet`] — a named, idempotent registry of [`Subscriber`]s
//!   driven by a single background dispatch loop.
//! - [`NotificationWriter`] — the built-in subscriber that turns report
//!   events into `notifications` rows for the post owner.

pub mod bus;
pub mod subscribers;

pub use bus::{EventBus, ReportEvent};
pub use subscribers::{NotificationWriter, Subscriber, SubscriberSet};
