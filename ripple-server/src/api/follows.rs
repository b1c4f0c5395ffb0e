use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use uuid::Uuid;

use crate::{
    api::{authenticate, viewer_profile, ApiError, ApiResult},
    db::repositories::{FollowOutcome, FollowRepository, ProfileRepository},
    policy::Access,
    state::AppState,
};
use ripple_types::ProfileSummary;

/// POST /profiles/:id/follow - Follow a profile
pub async fn follow_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;
    let follower = viewer_profile(&state, &identity)?;

    let following_id = Uuid::parse_str(&profile_id)
        .map_err(|_| ApiError::Validation("Invalid profile ID".to_string()))?;

    if follower.id == following_id {
        return Err(ApiError::Validation(
            "You cannot follow yourself".to_string(),
        ));
    }

    // Verify the target exists
    ProfileRepository::new(state.db.pool.clone())
        .find_by_id(&following_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let repo = FollowRepository::new(state.db.pool.clone());
    match repo.follow(&follower.id, &following_id)? {
        FollowOutcome::Followed => Ok(Json(serde_json::json!({
            "message": "You are now following this profile"
        }))),
        FollowOutcome::AlreadyFollowing => Err(ApiError::Conflict(
            "You have already followed this profile".to_string(),
        )),
    }
}

/// DELETE /profiles/:id/follow - Unfollow a profile. A missing edge is a
/// soft outcome, not an error.
pub async fn unfollow_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;
    let follower = viewer_profile(&state, &identity)?;

    let following_id = Uuid::parse_str(&profile_id)
        .map_err(|_| ApiError::Validation("Invalid profile ID".to_string()))?;

    ProfileRepository::new(state.db.pool.clone())
        .find_by_id(&following_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let repo = FollowRepository::new(state.db.pool.clone());
    let removed = repo.unfollow(&follower.id, &following_id)?;

    if removed > 0 {
        Ok(Json(serde_json::json!({
            "message": "You unfollowed this profile",
            "removed": true
        })))
    } else {
        Ok(Json(serde_json::json!({
            "message": "You haven't followed this profile",
            "removed": false
        })))
    }
}

/// GET /my_followers - Profiles following the caller, oldest edge first
pub async fn my_followers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ProfileSummary>>> {
    let identity = authenticate(&headers, Access::Read)?;
    let viewer = viewer_profile(&state, &identity)?;

    let repo = FollowRepository::new(state.db.pool.clone());
    Ok(Json(repo.followers_of(&viewer.id)?))
}

/// GET /my_followings - Profiles the caller follows, oldest edge first
pub async fn my_followings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ProfileSummary>>> {
    let identity = authenticate(&headers, Access::Read)?;
    let viewer = viewer_profile(&state, &identity)?;

    let repo = FollowRepository::new(state.db.pool.clone());
    Ok(Json(repo.followings_of(&viewer.id)?))
}
