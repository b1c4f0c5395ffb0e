use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{authenticate, ensure_owner, owner_identity_of, viewer_profile, ApiError, ApiResult},
    db::repositories::{CommentRepository, PostRepository},
    policy::Access,
    state::AppState,
};
use ripple_types::{Comment, CommentView, CreateCommentRequest, UpdateCommentRequest};

/// GET /posts/:id/comments - Comments under a post, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<CommentView>>> {
    authenticate(&headers, Access::Read)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    PostRepository::new(state.db.pool.clone())
        .get_by_id(&post_id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let repo = CommentRepository::new(state.db.pool.clone());
    Ok(Json(repo.list_for_post(&post_id)?))
}

/// POST /posts/:id/comments - Comment on a post
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let identity = authenticate(&headers, Access::Write)?;
    let author = viewer_profile(&state, &identity)?;

    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| ApiError::Validation("Invalid post ID".to_string()))?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation(
            "Comment content cannot be empty".to_string(),
        ));
    }

    PostRepository::new(state.db.pool.clone())
        .get_by_id(&post_id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let comment = Comment {
        id: Uuid::new_v4(),
        author_id: author.id,
        post_id,
        content: payload.content,
        created_at: Utc::now(),
    };
    CommentRepository::new(state.db.pool.clone()).create(&comment)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /comments/:id - Rewrite a comment (owner or admin)
pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<String>,
    Json(payload): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let identity = authenticate(&headers, Access::Write)?;

    let comment_id = Uuid::parse_str(&comment_id)
        .map_err(|_| ApiError::Validation("Invalid comment ID".to_string()))?;

    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation(
            "Comment content cannot be empty".to_string(),
        ));
    }

    let repo = CommentRepository::new(state.db.pool.clone());
    let mut comment = repo
        .get_by_id(&comment_id)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    let owner = owner_identity_of(&state, &comment.author_id)?;
    ensure_owner(&identity, owner, "edit this comment")?;

    repo.update_content(&comment_id, &payload.content)?;
    comment.content = payload.content;

    Ok(Json(comment))
}

/// DELETE /comments/:id - Delete a comment (owner or admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;

    let comment_id = Uuid::parse_str(&comment_id)
        .map_err(|_| ApiError::Validation("Invalid comment ID".to_string()))?;

    let repo = CommentRepository::new(state.db.pool.clone());
    let comment = repo
        .get_by_id(&comment_id)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    let owner = owner_identity_of(&state, &comment.author_id)?;
    ensure_owner(&identity, owner, "delete this comment")?;

    repo.delete(&comment_id)?;

    Ok(Json(serde_json::json!({
        "message": "Comment deleted successfully",
        "comment_id": comment_id
    })))
}
