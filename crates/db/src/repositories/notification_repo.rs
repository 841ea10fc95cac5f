//! Repository for the `notifications` table.

use pawtrail_core::error::CoreError;
use pawtrail_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;
use crate::DbError;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, post_id, report_id, message, is_read, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification for a post/report pair, returning the row.
    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        report_id: DbId,
        message: &str,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (post_id, report_id, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(post_id)
            .bind(report_id)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// List unread notifications for a post, newest first.
    pub async fn unread_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE post_id = $1 AND is_read = false
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Mark every unread notification on a post as read, atomically.
    ///
    /// Returns the number of notifications that were flipped; fails with
    /// `NotFound` when the post itself does not exist.
    pub async fn mark_read_for_post(pool: &PgPool, post_id: DbId) -> Result<u64, DbError> {
        // One transaction, so a post deleted mid-call reads as NotFound
        // rather than a silent zero-count flip over cascaded rows.
        let mut tx = pool.begin().await?;

        let post_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;
        if !post_exists {
            return Err(CoreError::NotFound {
                entity: "Post",
                id: post_id,
            }
            .into());
        }

        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE post_id = $1 AND is_read = false",
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
