//! Handlers for the `/reports` resource, including reward settlement.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pawtrail_core::error::CoreError;
use pawtrail_core::report::{NewReport, ReportInput};
use pawtrail_core::storage::cleanup_photos;
use pawtrail_core::types::DbId;
use pawtrail_db::models::report::ReportDetail;
use pawtrail_db::repositories::{ReportRepo, SettlementRepo};
use pawtrail_events::ReportEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::post::ensure_owner;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/reports
///
/// File a sighting report against a lost post. Publishes `report.created`
/// after the commit; a slow or failing subscriber never affects the
/// response.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ReportInput>,
) -> AppResult<(StatusCode, Json<ReportDetail>)> {
    let photo_paths = input.photo_paths.clone();

    let result = async {
        let report = NewReport::from_input(user.user_id, input)?;
        Ok(ReportRepo::create(&state.pool, &report).await?)
    }
    .await;

    match result {
        Ok(detail) => {
            state.event_bus.publish(
                ReportEvent::created(detail.report.post_id, detail.report.id)
                    .with_actor(user.user_id),
            );
            Ok((StatusCode::CREATED, Json(detail)))
        }
        Err(err) => {
            cleanup_photos(state.storage.as_ref(), &photo_paths).await;
            Err(err)
        }
    }
}

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReportDetail>> {
    let detail = ReportRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;
    Ok(Json(detail))
}

/// PUT /api/v1/reports/{id}/reject
///
/// Owner-only. Rejection is terminal; a second attempt conflicts.
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReportDetail>> {
    let post_id = post_id_of(&state, id).await?;
    ensure_owner(&state, &user, post_id).await?;

    let detail = ReportRepo::reject(&state.pool, id).await?;
    Ok(Json(detail))
}

/// PUT /api/v1/reports/{id}/reward
///
/// Owner-only. Runs the full settlement workflow (credit the reporter,
/// mark the post found, reward the report) in one transaction, then
/// publishes `report.rewarded`.
pub async fn reward(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReportDetail>> {
    let post_id = post_id_of(&state, id).await?;
    ensure_owner(&state, &user, post_id).await?;

    let detail = SettlementRepo::settle(&state.pool, id).await?;

    state
        .event_bus
        .publish(ReportEvent::rewarded(post_id, id).with_actor(user.user_id));

    Ok(Json(detail))
}

/// Resolve the post a report belongs to, or 404.
async fn post_id_of(state: &AppState, report_id: DbId) -> Result<DbId, AppError> {
    let detail = ReportRepo::find_detail(&state.pool, report_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id: report_id,
        }))?;
    Ok(detail.report.post_id)
}
