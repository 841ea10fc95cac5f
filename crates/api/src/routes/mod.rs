pub mod auth;
pub mod health;
pub mod post;
pub mod report;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /users/me                              current user (GET)
/// /users/me/top-up                       add balance points (POST)
/// /users/{id}                            public profile (GET)
///
/// /posts                                 list, create
/// /posts/{id}                            get
/// /posts/{id}/found                      mark found (PUT, owner only)
/// /posts/{id}/close                      close (PUT, owner only)
/// /posts/{id}/reports                    list reports (GET, owner only)
/// /posts/{id}/notifications              unread notifications (GET, owner only)
/// /posts/{id}/notifications/read         mark all read (PUT, owner only)
///
/// /reports                               create (POST)
/// /reports/{id}                          get
/// /reports/{id}/reject                   reject (PUT, owner only)
/// /reports/{id}/reward                   settle reward (PUT, owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // User profile and balance.
        .nest("/users", user::router())
        // Lost pet posts and their sub-resources.
        .nest("/posts", post::router())
        // Sighting reports and settlement.
        .nest("/reports", report::router())
}
