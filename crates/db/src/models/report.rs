//! Report entity models.

use pawtrail_core::status::ReportStatus;
use pawtrail_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub post_id: DbId,
    pub reporter_id: DbId,
    pub description: String,
    pub location: Option<String>,
    pub status: ReportStatus,
    pub created_at: Timestamp,
}

/// A row from the `report_photos` table. Immutable, cascade-deleted with
/// its report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportPhoto {
    pub id: DbId,
    pub report_id: DbId,
    pub photo_url: String,
    pub created_at: Timestamp,
}

/// A report with its photos, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub photos: Vec<ReportPhoto>,
}
