//! Report construction pipeline: validates raw input for a found-pet report.
//!
//! The post-is-still-lost precondition is stateful and therefore checked
//! inside the creation transaction in `pawtrail-db`, not here.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of photos allowed on a report. Unlike posts, zero is valid.
pub const MAX_REPORT_PHOTOS: usize = 4;

/// Raw, unvalidated input for creating a report.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportInput {
    pub post_id: DbId,
    pub description: String,
    pub location: Option<String>,
    #[serde(default)]
    pub photo_paths: Vec<String>,
}

/// A fully validated report ready for persistence. Status is always
/// `pending` at creation; callers cannot set it.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub post_id: DbId,
    pub reporter_id: DbId,
    pub description: String,
    pub location: Option<String>,
    pub photo_paths: Vec<String>,
}

impl NewReport {
    /// Validate `input` and assemble a [`NewReport`].
    pub fn from_input(reporter_id: DbId, input: ReportInput) -> Result<Self, CoreError> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(CoreError::missing_field("description"));
        }

        if input.photo_paths.len() > MAX_REPORT_PHOTOS {
            return Err(CoreError::Validation {
                field: "photo_paths",
                reason: format!("at most {MAX_REPORT_PHOTOS} photos are allowed"),
            });
        }

        let location = input
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Ok(NewReport {
            post_id: input.post_id,
            reporter_id,
            description: description.to_string(),
            location,
            photo_paths: input.photo_paths,
        })
    }
}
