//! Repository for the `posts` table and its owned photos and reward.

use pawtrail_core::error::CoreError;
use pawtrail_core::post::NewPost;
use pawtrail_core::status::PostStatus;
use pawtrail_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{Photo, Post, PostDetail, Reward};
use crate::DbError;

/// Column list for `posts` queries.
const COLUMNS: &str = "id, owner_id, pet_name, pet_species, pet_breed, \
                       last_seen_location, contact_information, description, status, created_at";

/// Column list for `rewards` queries.
const REWARD_COLUMNS: &str = "id, post_id, amount, status, created_at";

/// Provides operations for posts, photos, and rewards.
pub struct PostRepo;

impl PostRepo {
    /// Create a post together with its photos and reward record, debiting
    /// the owner's balance when a reward is offered.
    ///
    /// Runs as a single transaction: the owner row is locked for the
    /// duration, the balance precondition is checked before any insert, and
    /// post + photos + reward + debit commit or roll back as a unit. The
    /// reward row is created even when the amount is 0.
    pub async fn create(pool: &PgPool, input: &NewPost) -> Result<PostDetail, DbError> {
        let mut tx = pool.begin().await?;

        // Lock the owner row so the balance check and the debit are one
        // atomic unit against concurrent debits or top-ups.
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
                .bind(input.owner_id)
                .fetch_optional(&mut *tx)
                .await?;

        let balance = balance.ok_or(CoreError::NotFound {
            entity: "User",
            id: input.owner_id,
        })?;

        if input.has_reward() && balance < input.reward_points {
            return Err(CoreError::InsufficientBalance {
                current: balance,
                required: input.reward_points,
            }
            .into());
        }

        let insert_post = format!(
            "INSERT INTO posts (owner_id, pet_name, pet_species, pet_breed, \
                                last_seen_location, contact_information, description, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'lost')
             RETURNING {COLUMNS}"
        );
        let post: Post = sqlx::query_as(&insert_post)
            .bind(input.owner_id)
            .bind(&input.pet_name)
            .bind(&input.pet_species)
            .bind(&input.pet_breed)
            .bind(&input.last_seen_location)
            .bind(&input.contact_information)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        for path in &input.photo_paths {
            sqlx::query("INSERT INTO photos (post_id, photo_url) VALUES ($1, $2)")
                .bind(post.id)
                .bind(path)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("INSERT INTO rewards (post_id, amount) VALUES ($1, $2)")
            .bind(post.id)
            .bind(input.reward_points)
            .execute(&mut *tx)
            .await?;

        if input.has_reward() {
            let debited =
                sqlx::query("UPDATE users SET balance = balance - $2 WHERE id = $1 AND balance >= $2")
                    .bind(input.owner_id)
                    .bind(input.reward_points)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            if debited == 0 {
                // The owner row was checked and locked above, so a failed
                // debit means the invariant broke underneath us. Roll the
                // whole creation back rather than commit a post whose
                // reward was never paid for.
                tracing::error!(
                    owner_id = input.owner_id,
                    reward = input.reward_points,
                    "Balance debit failed after post insert"
                );
                return Err(CoreError::Inconsistency(format!(
                    "failed to debit {} points from user {}",
                    input.reward_points, input.owner_id
                ))
                .into());
            }
        }

        tx.commit().await?;

        Self::find_detail(pool, post.id)
            .await?
            .ok_or_else(|| CoreError::Inconsistency(format!("post {} vanished after create", post.id)).into())
    }

    /// Load a post with its photos and reward.
    ///
    /// A post without a reward row violates the creation invariant and is
    /// reported as an internal inconsistency.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<PostDetail>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        let Some(post) = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let photos = sqlx::query_as::<_, Photo>(
            "SELECT id, post_id, photo_url, created_at FROM photos \
             WHERE post_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let reward_query = format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE post_id = $1");
        let reward = sqlx::query_as::<_, Reward>(&reward_query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::Inconsistency(format!("post {id} has no reward record")))?;

        Ok(Some(PostDetail {
            post,
            photos,
            reward,
        }))
    }

    /// List posts, newest first, optionally filtered by status and/or owner.
    pub async fn list(
        pool: &PgPool,
        status: Option<PostStatus>,
        owner_id: Option<DbId>,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE ($1::post_status IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR owner_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(status)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Check whether a post exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Check whether `user_id` owns the post.
    pub async fn is_owner(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1 AND owner_id = $2)")
            .bind(id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Transition a post out of `lost` into a terminal status (`found` or
    /// `closed`). The status guard is part of the UPDATE itself, so the
    /// transition happens at most once.
    ///
    /// Returns `None` if the post does not exist or is no longer `lost`.
    pub async fn set_terminal_status(
        pool: &PgPool,
        id: DbId,
        status: PostStatus,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET status = $2
             WHERE id = $1 AND status = 'lost'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
