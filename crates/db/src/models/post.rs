//! Post, photo, and reward entity models.

use pawtrail_core::status::{PostStatus, RewardStatus};
use pawtrail_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub owner_id: DbId,
    pub pet_name: String,
    pub pet_species: String,
    pub pet_breed: String,
    pub last_seen_location: String,
    pub contact_information: String,
    pub description: String,
    pub status: PostStatus,
    pub created_at: Timestamp,
}

/// A row from the `photos` table. Immutable after creation; removed only by
/// cascade or compensating cleanup when post creation fails.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub post_id: DbId,
    pub photo_url: String,
    pub created_at: Timestamp,
}

/// A row from the `rewards` table. Every post owns exactly one, even when
/// the amount is 0.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reward {
    pub id: DbId,
    pub post_id: DbId,
    pub amount: i64,
    pub status: RewardStatus,
    pub created_at: Timestamp,
}

/// A post with its owned photos and reward, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub photos: Vec<Photo>,
    pub reward: Reward,
}
