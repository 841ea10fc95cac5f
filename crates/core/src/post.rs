//! Post construction pipeline: validates raw client input and assembles the
//! fields of a new post, its photos, and its reward record.
//!
//! Validation runs fully before any write. The output is a plain immutable
//! value struct; persistence (and the balance debit) happens atomically in
//! `pawtrail-db`.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum number of photos required on a post.
pub const MIN_POST_PHOTOS: usize = 1;

/// Maximum number of photos allowed on a post.
pub const MAX_POST_PHOTOS: usize = 4;

/// Breed recorded when the owner does not know it.
pub const DEFAULT_BREED: &str = "Unknown";

/// Raw, unvalidated input for creating a post. The photo paths are opaque
/// strings already produced by the upload layer.
#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    pub pet_name: String,
    pub pet_species: String,
    pub pet_breed: Option<String>,
    pub last_seen_location: String,
    pub contact_information: String,
    pub description: Option<String>,
    #[serde(default)]
    pub photo_paths: Vec<String>,
    pub reward_points: Option<i64>,
}

/// A fully validated post ready for atomic persistence.
///
/// Invariants held by construction:
/// - all required fields are non-blank
/// - 1..=4 photo paths
/// - `reward_points >= 0` (negative input is clamped, never rejected)
#[derive(Debug, Clone)]
pub struct NewPost {
    pub owner_id: DbId,
    pub pet_name: String,
    pub pet_species: String,
    pub pet_breed: String,
    pub last_seen_location: String,
    pub contact_information: String,
    pub description: String,
    pub photo_paths: Vec<String>,
    pub reward_points: i64,
}

impl NewPost {
    /// Validate `input` and assemble a [`NewPost`].
    ///
    /// Defaulting rules:
    /// - `pet_breed` falls back to [`DEFAULT_BREED`]
    /// - a blank `description` becomes
    ///   `"Lost pet named {pet_name}. Please contact if found."`
    /// - `reward_points` defaults to 0 and is clamped at 0 from below
    pub fn from_input(owner_id: DbId, input: PostInput) -> Result<Self, CoreError> {
        let pet_name = required(&input.pet_name, "pet_name")?;
        let pet_species = required(&input.pet_species, "pet_species")?;
        let last_seen_location = required(&input.last_seen_location, "last_seen_location")?;
        let contact_information = required(&input.contact_information, "contact_information")?;

        if input.photo_paths.len() < MIN_POST_PHOTOS {
            return Err(CoreError::Validation {
                field: "photo_paths",
                reason: format!("at least {MIN_POST_PHOTOS} photo is required"),
            });
        }
        if input.photo_paths.len() > MAX_POST_PHOTOS {
            return Err(CoreError::Validation {
                field: "photo_paths",
                reason: format!("at most {MAX_POST_PHOTOS} photos are allowed"),
            });
        }

        let pet_breed = match input.pet_breed.as_deref().map(str::trim) {
            Some(breed) if !breed.is_empty() => breed.to_string(),
            _ => DEFAULT_BREED.to_string(),
        };

        let description = match input.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => format!("Lost pet named {pet_name}. Please contact if found."),
        };

        let reward_points = input.reward_points.unwrap_or(0).max(0);

        Ok(NewPost {
            owner_id,
            pet_name,
            pet_species,
            pet_breed,
            last_seen_location,
            contact_information,
            description,
            photo_paths: input.photo_paths,
            reward_points,
        })
    }

    /// Whether the post offers a meaningful reward. The reward row itself is
    /// created either way.
    pub fn has_reward(&self) -> bool {
        self.reward_points > 0
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::missing_field(field));
    }
    Ok(trimmed.to_string())
}
