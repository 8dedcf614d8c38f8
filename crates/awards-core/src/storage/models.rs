//! Data models for awards storage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub voting_locked: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Nominee {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub image_url: Option<String>,
    pub youtube_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: String,
    pub nominee_id: String,
    pub category_id: String,
    pub voter_ip: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub password_changed_at: Option<i64>,
}

/// Whether a cast vote inserted a new row or replaced the voter's earlier choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Created,
    Updated,
}

/// A vote as stored after casting, tagged with what the cast did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedVote {
    #[serde(flatten)]
    pub vote: Vote,
    pub action: VoteAction,
}

/// One row of a category's ranked results.
///
/// `nominee` is `None` when votes reference a nominee that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NomineeTally {
    pub nominee_id: String,
    pub vote_count: i64,
    pub nominee: Option<Nominee>,
}

/// What a category delete removed.
#[derive(Debug, Clone)]
pub struct CategoryRemoval {
    pub category: Category,
    /// Nominees deleted with the category; callers clean up their uploads.
    pub nominees: Vec<Nominee>,
    pub deleted_votes: u64,
}

/// What a nominee delete removed.
#[derive(Debug, Clone)]
pub struct NomineeRemoval {
    pub nominee: Nominee,
    pub deleted_votes: u64,
}

/// Per-category counters for the admin CLI.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryStats {
    pub id: String,
    pub name: String,
    pub voting_locked: bool,
    pub nominee_count: i64,
    pub vote_count: i64,
}
