//! Repository for the `reports` table and its owned photos.

use pawtrail_core::error::CoreError;
use pawtrail_core::report::NewReport;
use pawtrail_core::settlement::ensure_pending;
use pawtrail_core::status::PostStatus;
use pawtrail_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::{Report, ReportDetail, ReportPhoto};
use crate::DbError;

/// Column list for `reports` queries.
pub(crate) const COLUMNS: &str =
    "id, post_id, reporter_id, description, location, status, created_at";

/// Provides operations for reports and report photos.
pub struct ReportRepo;

impl ReportRepo {
    /// Create a report with its photos.
    ///
    /// Runs as a single transaction. The target post row is locked and its
    /// status checked inside the transaction: reports against a post that is
    /// `found` or `closed` fail with `PostNotActive` and persist nothing.
    /// The report status is always `pending` at creation.
    pub async fn create(pool: &PgPool, input: &NewReport) -> Result<ReportDetail, DbError> {
        let mut tx = pool.begin().await?;

        let post_status: Option<PostStatus> =
            sqlx::query_scalar("SELECT status FROM posts WHERE id = $1 FOR UPDATE")
                .bind(input.post_id)
                .fetch_optional(&mut *tx)
                .await?;

        let post_status = post_status.ok_or(CoreError::NotFound {
            entity: "Post",
            id: input.post_id,
        })?;

        if !post_status.accepts_reports() {
            return Err(CoreError::PostNotActive {
                current_status: post_status,
            }
            .into());
        }

        let insert = format!(
            "INSERT INTO reports (post_id, reporter_id, description, location, status)
             VALUES ($1, $2, $3, $4, 'pending')
             RETURNING {COLUMNS}"
        );
        let report: Report = sqlx::query_as(&insert)
            .bind(input.post_id)
            .bind(input.reporter_id)
            .bind(&input.description)
            .bind(&input.location)
            .fetch_one(&mut *tx)
            .await?;

        for path in &input.photo_paths {
            sqlx::query("INSERT INTO report_photos (report_id, photo_url) VALUES ($1, $2)")
                .bind(report.id)
                .bind(path)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Self::find_detail(pool, report.id)
            .await?
            .ok_or_else(|| {
                CoreError::Inconsistency(format!("report {} vanished after create", report.id))
                    .into()
            })
    }

    /// Load a report with its photos.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ReportDetail>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        let Some(report) = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let photos = Self::photos(pool, id).await?;
        Ok(Some(ReportDetail { report, photos }))
    }

    /// List all reports for a post, newest first.
    pub async fn list_by_post(pool: &PgPool, post_id: DbId) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE post_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Reject a report: the `pending -> rejected` transition.
    ///
    /// No balance transfer and no post transition happen here; it shares
    /// only the terminal-state invariant with settlement. The status check
    /// is part of the UPDATE itself, so a report can never be rejected (or
    /// race a settlement) twice.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<ReportDetail, DbError> {
        let rejected =
            sqlx::query("UPDATE reports SET status = 'rejected' WHERE id = $1 AND status = 'pending'")
                .bind(id)
                .execute(pool)
                .await?
                .rows_affected();

        if rejected == 0 {
            // Distinguish a missing report from one already settled.
            let current: Option<pawtrail_core::status::ReportStatus> =
                sqlx::query_scalar("SELECT status FROM reports WHERE id = $1")
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
            return match current {
                None => Err(CoreError::NotFound {
                    entity: "Report",
                    id,
                }
                .into()),
                Some(status) => {
                    ensure_pending(status)?;
                    // Pending but not updated: the row settled between our
                    // two statements. Same terminal answer for the caller.
                    Err(CoreError::AlreadySettled.into())
                }
            };
        }

        Self::find_detail(pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::Inconsistency(format!("report {id} vanished after reject")).into()
            })
    }

    async fn photos(pool: &PgPool, report_id: DbId) -> Result<Vec<ReportPhoto>, sqlx::Error> {
        sqlx::query_as::<_, ReportPhoto>(
            "SELECT id, report_id, photo_url, created_at FROM report_photos \
             WHERE report_id = $1 ORDER BY id",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
    }
}
