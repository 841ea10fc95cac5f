//! Handlers for the `/posts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawtrail_core::error::CoreError;
use pawtrail_core::post::{NewPost, PostInput};
use pawtrail_core::status::PostStatus;
use pawtrail_core::storage::cleanup_photos;
use pawtrail_core::types::DbId;
use pawtrail_db::models::post::{Post, PostDetail};
use pawtrail_db::models::report::Report;
use pawtrail_db::repositories::{PostRepo, ReportRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /posts`.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<PostStatus>,
    pub user_id: Option<DbId>,
}

/// POST /api/v1/posts
///
/// Runs the full creation pipeline: validation, post + photos + reward
/// insertion, and the reward debit, all or nothing. The incoming photo
/// paths were already saved by the upload layer, so any failure deletes
/// them again, best effort.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<PostInput>,
) -> AppResult<(StatusCode, Json<PostDetail>)> {
    let photo_paths = input.photo_paths.clone();

    let result = async {
        let post = NewPost::from_input(user.user_id, input)?;
        Ok(PostRepo::create(&state.pool, &post).await?)
    }
    .await;

    match result {
        Ok(detail) => Ok((StatusCode::CREATED, Json(detail))),
        Err(err) => {
            cleanup_photos(state.storage.as_ref(), &photo_paths).await;
            Err(err)
        }
    }
}

/// GET /api/v1/posts
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let posts = PostRepo::list(&state.pool, query.status, query.user_id).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PostDetail>> {
    let detail = PostRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(detail))
}

/// PUT /api/v1/posts/{id}/found
pub async fn mark_found(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Post>> {
    transition(&state, &user, id, PostStatus::Found).await
}

/// PUT /api/v1/posts/{id}/close
pub async fn close(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Post>> {
    transition(&state, &user, id, PostStatus::Closed).await
}

/// Owner-only transition of a post out of `lost`.
async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    status: PostStatus,
) -> AppResult<Json<Post>> {
    ensure_owner(state, user, id).await?;

    let post = PostRepo::set_terminal_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Post is no longer in lost status".to_string(),
            ))
        })?;
    Ok(Json(post))
}

/// GET /api/v1/posts/{id}/reports
pub async fn list_reports(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    ensure_owner(&state, &user, id).await?;
    let reports = ReportRepo::list_by_post(&state.pool, id).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// Verify the post exists and is owned by the authenticated user.
pub(crate) async fn ensure_owner(
    state: &AppState,
    user: &AuthUser,
    post_id: DbId,
) -> Result<(), AppError> {
    if !PostRepo::exists(&state.pool, post_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }));
    }
    if !PostRepo::is_owner(&state.pool, post_id, user.user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the post owner may perform this action".to_string(),
        )));
    }
    Ok(())
}
