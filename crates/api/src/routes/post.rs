//! Route definitions for the `/posts` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{notification, post};
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET  /                        -> list
/// POST /                        -> create
/// GET  /{id}                    -> get_by_id
/// PUT  /{id}/found              -> mark_found (owner only)
/// PUT  /{id}/close              -> close (owner only)
/// GET  /{id}/reports            -> list_reports (owner only)
/// GET  /{id}/notifications      -> list_unread (owner only)
/// PUT  /{id}/notifications/read -> mark_read (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(post::list).post(post::create))
        .route("/{id}", get(post::get_by_id))
        .route("/{id}/found", put(post::mark_found))
        .route("/{id}/close", put(post::close))
        .route("/{id}/reports", get(post::list_reports))
        .route("/{id}/notifications", get(notification::list_unread))
        .route("/{id}/notifications/read", put(notification::mark_read))
}
