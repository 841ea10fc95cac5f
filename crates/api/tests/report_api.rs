//! Integration tests for the `/reports` endpoints: filing, rejection,
//! reward settlement, and the notification flow driven by report events.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get_auth, post_json, put_auth, register, top_up};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_post(app: &Router, token: &str, reward_points: i64) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/posts",
        Some(token),
        json!({
            "pet_name": "Pepper",
            "pet_species": "Cat",
            "last_seen_location": "Birch Lane",
            "contact_information": "555-0188",
            "photo_paths": ["uploads/pepper.jpg"],
            "reward_points": reward_points,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_report(app: &Router, token: &str, post_id: i64) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/reports",
        Some(token),
        json!({
            "post_id": post_id,
            "description": "Saw a cat matching this on Birch Lane",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Poll the post's unread notifications until `expected` arrive. Dispatch is
/// asynchronous, so the rows may land shortly after the triggering request
/// returns.
async fn wait_for_unread(app: &Router, token: &str, post_id: i64, expected: usize) -> Value {
    let path = format!("/api/v1/posts/{post_id}/notifications");
    for _ in 0..50 {
        let json = body_json(get_auth(app.clone(), &path, token).await).await;
        if json["data"].as_array().unwrap().len() >= expected {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
    panic!("expected {expected} unread notifications on post {post_id}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn reward_settlement_credits_reporter_and_marks_post_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register(&app, "owner", "owner@example.com").await;
    let (reporter_token, reporter_id) = register(&app, "reporter", "reporter@example.com").await;
    top_up(&app, &owner_token, 50).await;

    let post_id = create_post(&app, &owner_token, 30).await;
    let report_id = create_report(&app, &reporter_token, post_id).await;

    let response = put_auth(
        app.clone(),
        &format!("/api/v1/reports/{report_id}/reward"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "rewarded");

    // Reporter went from 0 to 30 points.
    let reporter = body_json(
        get_auth(app.clone(), &format!("/api/v1/users/{reporter_id}"), &owner_token).await,
    )
    .await;
    assert_eq!(reporter["balance"], 30);

    // Owner keeps the 20 left after the escrow at posting time.
    let owner = body_json(get_auth(app.clone(), "/api/v1/users/me", &owner_token).await).await;
    assert_eq!(owner["balance"], 20);

    let post = body_json(get_auth(app, &format!("/api/v1/posts/{post_id}"), &owner_token).await).await;
    assert_eq!(post["status"], "found");
    assert_eq!(post["reward"]["status"], "completed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_reward_attempt_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register(&app, "owner", "owner@example.com").await;
    let (reporter_token, _) = register(&app, "reporter", "reporter@example.com").await;
    top_up(&app, &owner_token, 50).await;

    let post_id = create_post(&app, &owner_token, 30).await;
    let report_id = create_report(&app, &reporter_token, post_id).await;
    let reward_path = format!("/api/v1/reports/{report_id}/reward");

    let response = put_auth(app.clone(), &reward_path, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_auth(app, &reward_path, &owner_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_SETTLED");
}

#[sqlx::test(migrations = "../../migrations")]
async fn rejected_report_cannot_be_rewarded(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register(&app, "owner", "owner@example.com").await;
    let (reporter_token, reporter_id) = register(&app, "reporter", "reporter@example.com").await;
    top_up(&app, &owner_token, 50).await;

    let post_id = create_post(&app, &owner_token, 30).await;
    let report_id = create_report(&app, &reporter_token, post_id).await;

    let response = put_auth(
        app.clone(),
        &format!("/api/v1/reports/{report_id}/reject"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "rejected");

    let response = put_auth(
        app.clone(),
        &format!("/api/v1/reports/{report_id}/reward"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The reporter was never paid and the post stayed lost.
    let reporter = body_json(
        get_auth(app.clone(), &format!("/api/v1/users/{reporter_id}"), &owner_token).await,
    )
    .await;
    assert_eq!(reporter["balance"], 0);
    let post = body_json(get_auth(app, &format!("/api/v1/posts/{post_id}"), &owner_token).await).await;
    assert_eq!(post["status"], "lost");
}

#[sqlx::test(migrations = "../../migrations")]
async fn report_on_found_post_is_rejected_with_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register(&app, "owner", "owner@example.com").await;
    let (reporter_token, _) = register(&app, "reporter", "reporter@example.com").await;
    top_up(&app, &owner_token, 50).await;

    let post_id = create_post(&app, &owner_token, 30).await;
    put_auth(app.clone(), &format!("/api/v1/posts/{post_id}/found"), &owner_token).await;

    let response = post_json(
        app,
        "/api/v1/reports",
        Some(&reporter_token),
        json!({
            "post_id": post_id,
            "description": "Too late, but I saw it",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "POST_NOT_ACTIVE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn only_owner_may_settle(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register(&app, "owner", "owner@example.com").await;
    let (reporter_token, _) = register(&app, "reporter", "reporter@example.com").await;
    top_up(&app, &owner_token, 50).await;

    let post_id = create_post(&app, &owner_token, 30).await;
    let report_id = create_report(&app, &reporter_token, post_id).await;

    // The reporter cannot reward their own report.
    let response = put_auth(
        app,
        &format!("/api/v1/reports/{report_id}/reward"),
        &reporter_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../migrations")]
async fn report_events_produce_notifications_and_mark_read_counts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = register(&app, "owner", "owner@example.com").await;
    let (reporter_token, _) = register(&app, "reporter", "reporter@example.com").await;
    top_up(&app, &owner_token, 50).await;

    let post_id = create_post(&app, &owner_token, 30).await;
    create_report(&app, &reporter_token, post_id).await;
    create_report(&app, &reporter_token, post_id).await;

    let unread = wait_for_unread(&app, &owner_token, post_id, 2).await;
    assert_eq!(unread["data"][0]["message"], "New report submission");
    assert_eq!(unread["data"][0]["is_read"], false);

    let response = put_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}/notifications/read"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["updated_count"], 2);

    // Everything is read now; a second pass flips nothing.
    let response = put_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}/notifications/read"),
        &owner_token,
    )
    .await;
    assert_eq!(body_json(response).await["updated_count"], 0);

    let unread = body_json(
        get_auth(
            app,
            &format!("/api/v1/posts/{post_id}/notifications"),
            &owner_token,
        )
        .await,
    )
    .await;
    assert!(unread["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_registration_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(&app, "first", "same@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        json!({
            "username": "second",
            "email": "same@example.com",
            "password": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
