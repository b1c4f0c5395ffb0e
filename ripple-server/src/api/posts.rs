use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{authenticate, ensure_owner, owner_identity_of, viewer_profile, ApiError, ApiResult},
    db::repositories::{LikeOutcome, LikeRepository, PostRepository, ProfileRepository},
    media,
    policy::Access,
    scheduler::ScheduledPost,
    state::AppState,
};
use ripple_types::{CreatePostRequest, FeedPost, Hashtag, Post, UploadImageRequest};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Case-insensitive substring match on the hashtag label
    #[serde(default)]
    hashtag: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    25
}

/// GET /posts - The viewer's feed: own posts plus posts by followed
/// profiles, newest first, with live aggregate counts
pub async fn get_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Vec<FeedPost>>> {
    let identity = authenticate(&headers, Access::Read)?;
    let viewer = viewer_profile(&state, &identity)?;

    let repo = PostRepository::new(state.db.pool.clone());
    let posts = repo.feed(
        &viewer.id,
        query.hashtag.as_deref(),
        query.limit,
        query.offset,
    )?;

    Ok(Json(posts))
}

/// POST /posts - Publish a post now, or hand it to the task runner when
/// `scheduled_in` names a later activation time
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Response> {
    let identity = authenticate(&headers, Access::Write)?;
    let author = viewer_profile(&state, &identity)?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation(
            "Post content cannot be empty".to_string(),
        ));
    }
    let hashtag = Hashtag::parse(&payload.hashtag).ok_or_else(|| {
        ApiError::Validation(format!(
            "Unknown hashtag '{}'; expected one of Travel, Food, Sport, Music, Tech, Other",
            payload.hashtag
        ))
    })?;

    if let Some(publish_at) = payload.scheduled_in {
        state
            .scheduler
            .schedule(ScheduledPost {
                author_id: author.id,
                content: payload.content,
                hashtag,
                publish_at,
            })
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        return Ok((
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "message": "Post accepted for deferred publication",
                "publish_at": publish_at
            })),
        )
            .into_response());
    }

    let post = Post {
        id: Uuid::new_v4(),
        author_id: author.id,
        content: payload.content,
        media: None,
        hashtag,
        created_at: Utc::now(),
    };
    PostRepository::new(state.db.pool.clone()).create(&post)?;

    Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// GET /posts/:id - A single post in feed shape; only posts inside the
/// viewer's visible-author set resolve
pub async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Json<FeedPost>> {
    let identity = authenticate(&headers, Access::Read)?;
    let viewer = viewer_profile(&state, &identity)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    let post = PostRepository::new(state.db.pool.clone())
        .get_for_viewer(&post_id, &viewer.id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// DELETE /posts/:id - Delete a post (owner or admin); comments and likes
/// go with it
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    let repo = PostRepository::new(state.db.pool.clone());
    let post = repo
        .get_by_id(&post_id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let owner = owner_identity_of(&state, &post.author_id)?;
    ensure_owner(&identity, owner, "delete this post")?;

    repo.delete(&post_id)?;

    Ok(Json(serde_json::json!({
        "message": "Post deleted successfully",
        "post_id": post_id
    })))
}

/// POST /posts/:id/upload-image - Replace the media reference; the one
/// mutation a published post allows
pub async fn upload_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(payload): Json<UploadImageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    let repo = PostRepository::new(state.db.pool.clone());
    let post = repo
        .get_by_id(&post_id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let author = ProfileRepository::new(state.db.pool.clone())
        .find_by_id(&post.author_id)?
        .ok_or_else(|| ApiError::Internal("Owning profile is missing".to_string()))?;
    ensure_owner(&identity, author.user_id, "change this post's media")?;

    let key = media::image_key(
        &state.media.upload_root,
        "posts",
        &author.full_name(),
        &payload.filename,
    );
    repo.set_media(&post_id, &key)?;

    Ok(Json(serde_json::json!({
        "id": post_id,
        "media": key
    })))
}

/// POST /posts/:id/like - Like a visible post
pub async fn like_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Response> {
    let identity = authenticate(&headers, Access::Write)?;
    let viewer = viewer_profile(&state, &identity)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    // Likes go through the same visibility scope as the feed
    PostRepository::new(state.db.pool.clone())
        .get_for_viewer(&post_id, &viewer.id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let repo = LikeRepository::new(state.db.pool.clone());
    match repo.like(&viewer.id, &post_id)? {
        LikeOutcome::Liked(like) => Ok((StatusCode::CREATED, Json(like)).into_response()),
        LikeOutcome::AlreadyLiked => Err(ApiError::Conflict(
            "You already liked this post".to_string(),
        )),
    }
}

/// DELETE /posts/:id/like - Remove a like. A missing like is a soft
/// outcome, not an error.
pub async fn unlike_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;
    let viewer = viewer_profile(&state, &identity)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    PostRepository::new(state.db.pool.clone())
        .get_for_viewer(&post_id, &viewer.id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let repo = LikeRepository::new(state.db.pool.clone());
    let removed = repo.unlike(&viewer.id, &post_id)?;

    if removed > 0 {
        Ok(Json(serde_json::json!({
            "message": "You unliked this post",
            "removed": true
        })))
    } else {
        Ok(Json(serde_json::json!({
            "message": "You haven't liked this post",
            "removed": false
        })))
    }
}

/// GET /posts/liked - Posts the viewer has liked
pub async fn liked_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<FeedPost>>> {
    let identity = authenticate(&headers, Access::Read)?;
    let viewer = viewer_profile(&state, &identity)?;

    let repo = PostRepository::new(state.db.pool.clone());
    Ok(Json(repo.liked_by(&viewer.id)?))
}
