//! Notification entity model.

use pawtrail_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// Notifications are written only by the event subscribers in
/// `pawtrail-events`, never directly from client input. `is_read` flips
/// solely through the bulk mark-read-for-post operation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub post_id: DbId,
    pub report_id: DbId,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
