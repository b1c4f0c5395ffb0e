use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::Hashtag;

/// Social identity record, distinct from the raw account identity that owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Identity (account) this profile extends; one profile per identity.
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
    /// Opaque media key resolved by the external media store.
    pub profile_picture: Option<String>,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// List shape for /profiles, annotated with graph counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
    pub profile_picture: Option<String>,
    pub followers_count: i64,
    pub followings_count: i64,
}

/// Detail shape for /profiles/:id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
    pub profile_picture: Option<String>,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub followers_count: i64,
    pub followings_count: i64,
    pub post_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    /// Opaque media key resolved by the external media store.
    pub media: Option<String>,
    pub hashtag: Hashtag,
    pub created_at: DateTime<Utc>,
}

/// Feed shape: a post annotated with its author and live aggregate counts.
/// Counts are computed at query time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub media: Option<String>,
    pub hashtag: Hashtag,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// List shape for a post's comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Request/Response types for API
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    /// One label from the fixed hashtag vocabulary.
    pub hashtag: String,
    /// When set, hand the draft to the deferred task runner instead of
    /// publishing immediately.
    #[serde(default)]
    pub scheduled_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Client names the original file; the server derives the stored media key.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadImageRequest {
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
