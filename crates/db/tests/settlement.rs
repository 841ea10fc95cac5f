//! Integration tests for the reward settlement workflow: the credit,
//! the post and report transitions, and the single-winner guarantees.

use pawtrail_core::error::CoreError;
use pawtrail_core::post::{NewPost, PostInput};
use pawtrail_core::report::{NewReport, ReportInput};
use pawtrail_core::status::{PostStatus, ReportStatus, RewardStatus};
use pawtrail_core::types::DbId;
use pawtrail_db::models::user::{CreateUser, User};
use pawtrail_db::repositories::{PostRepo, ReportRepo, SettlementRepo, UserRepo};
use assert_matches::assert_matches;
use pawtrail_db::DbError;
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, email: &str, balance: i64) -> User {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "tester".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .expect("user insert should succeed");
    if balance > 0 {
        UserRepo::top_up(pool, user.id, balance)
            .await
            .unwrap()
            .expect("top up should find the user")
    } else {
        user
    }
}

async fn seed_post(pool: &PgPool, owner_id: DbId, reward_points: i64) -> DbId {
    let input = PostInput {
        pet_name: "Rex".to_string(),
        pet_species: "Dog".to_string(),
        pet_breed: Some("Beagle".to_string()),
        last_seen_location: "Riverside Park".to_string(),
        contact_information: "555-0100".to_string(),
        description: None,
        photo_paths: vec!["uploads/rex.jpg".to_string()],
        reward_points: Some(reward_points),
    };
    let post = NewPost::from_input(owner_id, input).unwrap();
    PostRepo::create(pool, &post).await.unwrap().post.id
}

async fn seed_report(pool: &PgPool, reporter_id: DbId, post_id: DbId) -> DbId {
    let input = ReportInput {
        post_id,
        description: "Spotted near the river".to_string(),
        location: None,
        photo_paths: vec![],
    };
    let report = NewReport::from_input(reporter_id, input).unwrap();
    ReportRepo::create(pool, &report).await.unwrap().report.id
}

async fn balance_of(pool: &PgPool, id: DbId) -> i64 {
    sqlx::query_scalar("SELECT balance FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("balance query should succeed")
}

async fn post_status(pool: &PgPool, id: DbId) -> PostStatus {
    sqlx::query_scalar("SELECT status FROM posts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("status query should succeed")
}

async fn reward_status(pool: &PgPool, post_id: DbId) -> RewardStatus {
    sqlx::query_scalar("SELECT status FROM rewards WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .expect("reward query should succeed")
}

#[sqlx::test(migrations = "../../migrations")]
async fn settle_credits_reporter_and_closes_the_loop(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", 50).await;
    let reporter = seed_user(&pool, "reporter@example.com", 0).await;
    let post_id = seed_post(&pool, owner.id, 30).await;
    let report_id = seed_report(&pool, reporter.id, post_id).await;

    // Posting already debited the escrowed reward.
    assert_eq!(balance_of(&pool, owner.id).await, 20);

    let detail = SettlementRepo::settle(&pool, report_id)
        .await
        .expect("settlement should succeed");

    assert_eq!(detail.report.status, ReportStatus::Rewarded);
    assert_eq!(balance_of(&pool, owner.id).await, 20);
    assert_eq!(balance_of(&pool, reporter.id).await, 30);
    assert_eq!(post_status(&pool, post_id).await, PostStatus::Found);
    assert_eq!(reward_status(&pool, post_id).await, RewardStatus::Completed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_settle_fails_already_settled(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", 50).await;
    let reporter = seed_user(&pool, "reporter@example.com", 0).await;
    let post_id = seed_post(&pool, owner.id, 30).await;
    let report_id = seed_report(&pool, reporter.id, post_id).await;

    SettlementRepo::settle(&pool, report_id).await.unwrap();
    let err = SettlementRepo::settle(&pool, report_id)
        .await
        .expect_err("second settlement must fail");
    assert_matches!(err, DbError::Core(CoreError::AlreadySettled));

    // The credit did not happen twice.
    assert_eq!(balance_of(&pool, reporter.id).await, 30);
}

#[sqlx::test(migrations = "../../migrations")]
async fn settle_after_reject_fails_already_settled(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", 50).await;
    let reporter = seed_user(&pool, "reporter@example.com", 0).await;
    let post_id = seed_post(&pool, owner.id, 30).await;
    let report_id = seed_report(&pool, reporter.id, post_id).await;

    ReportRepo::reject(&pool, report_id).await.unwrap();
    let err = SettlementRepo::settle(&pool, report_id)
        .await
        .expect_err("settling a rejected report must fail");
    assert_matches!(err, DbError::Core(CoreError::AlreadySettled));

    assert_eq!(balance_of(&pool, reporter.id).await, 0);
    assert_eq!(post_status(&pool, post_id).await, PostStatus::Lost);
}

#[sqlx::test(migrations = "../../migrations")]
async fn zero_amount_reward_settles_without_credit(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", 0).await;
    let reporter = seed_user(&pool, "reporter@example.com", 0).await;
    let post_id = seed_post(&pool, owner.id, 0).await;
    let report_id = seed_report(&pool, reporter.id, post_id).await;

    let detail = SettlementRepo::settle(&pool, report_id).await.unwrap();

    assert_eq!(detail.report.status, ReportStatus::Rewarded);
    assert_eq!(balance_of(&pool, reporter.id).await, 0);
    assert_eq!(post_status(&pool, post_id).await, PostStatus::Found);
    assert_eq!(reward_status(&pool, post_id).await, RewardStatus::Completed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn only_one_of_two_reports_wins(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", 50).await;
    let reporter_a = seed_user(&pool, "a@example.com", 0).await;
    let reporter_b = seed_user(&pool, "b@example.com", 0).await;
    let post_id = seed_post(&pool, owner.id, 30).await;
    let report_a = seed_report(&pool, reporter_a.id, post_id).await;
    let report_b = seed_report(&pool, reporter_b.id, post_id).await;

    SettlementRepo::settle(&pool, report_a).await.unwrap();

    // The post is no longer lost, so the rival report cannot be settled.
    let err = SettlementRepo::settle(&pool, report_b)
        .await
        .expect_err("second report must not settle");
    assert_matches!(
        err,
        DbError::Core(CoreError::SettlementFailed { .. })
    );

    assert_eq!(balance_of(&pool, reporter_a.id).await, 30);
    assert_eq!(balance_of(&pool, reporter_b.id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn settle_missing_report_fails_not_found(pool: PgPool) {
    let err = SettlementRepo::settle(&pool, 424_242)
        .await
        .expect_err("must fail");
    assert_matches!(
        err,
        DbError::Core(CoreError::NotFound {
            entity: "Report",
            ..
        })
    );
}
