use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{authenticate, ensure_owner, ApiError, ApiResult},
    db::repositories::ProfileRepository,
    media,
    policy::Access,
    state::AppState,
};
use ripple_types::{
    CreateProfileRequest, Profile, ProfileDetail, ProfileSummary, UpdateProfileRequest,
    UploadImageRequest,
};

#[derive(Debug, Deserialize)]
pub struct ListProfilesQuery {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    25
}

/// GET /profiles - List profiles with graph counts, filterable by name
pub async fn list_profiles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListProfilesQuery>,
) -> ApiResult<Json<Vec<ProfileSummary>>> {
    authenticate(&headers, Access::Read)?;

    let repo = ProfileRepository::new(state.db.pool.clone());
    let profiles = repo.list(
        query.first_name.as_deref(),
        query.last_name.as_deref(),
        query.limit,
        query.offset,
    )?;

    Ok(Json(profiles))
}

/// POST /profiles - Create the caller's profile
pub async fn create_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let identity = authenticate(&headers, Access::Write)?;

    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "First and last name cannot be empty".to_string(),
        ));
    }

    let profile = Profile {
        id: Uuid::new_v4(),
        user_id: identity.id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        biography: payload.biography,
        profile_picture: None,
        phone_number: payload.phone_number,
        birth_date: payload.birth_date,
        created_at: Utc::now(),
    };

    // A second profile for the same identity, or a reused phone number,
    // trips a unique constraint and surfaces as Conflict.
    ProfileRepository::new(state.db.pool.clone()).create(&profile)?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /profiles/:id - Detailed profile with graph and post counts
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<ProfileDetail>> {
    authenticate(&headers, Access::Read)?;

    let profile_id = Uuid::parse_str(&profile_id)
        .map_err(|_| ApiError::Validation("Invalid profile ID".to_string()))?;

    let detail = ProfileRepository::new(state.db.pool.clone())
        .detail(&profile_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(detail))
}

/// PUT /profiles/:id - Update a profile (owner or admin)
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    let identity = authenticate(&headers, Access::Write)?;

    let profile_id = Uuid::parse_str(&profile_id)
        .map_err(|_| ApiError::Validation("Invalid profile ID".to_string()))?;

    let repo = ProfileRepository::new(state.db.pool.clone());
    let mut profile = repo
        .find_by_id(&profile_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    ensure_owner(&identity, profile.user_id, "edit this profile")?;

    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "First and last name cannot be empty".to_string(),
        ));
    }

    profile.first_name = payload.first_name;
    profile.last_name = payload.last_name;
    profile.biography = payload.biography;
    profile.phone_number = payload.phone_number;
    profile.birth_date = payload.birth_date;

    repo.update(&profile)?;

    Ok(Json(profile))
}

/// DELETE /profiles/:id - Delete a profile (owner or admin); the store
/// cascades to authored content and graph edges
pub async fn delete_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;

    let profile_id = Uuid::parse_str(&profile_id)
        .map_err(|_| ApiError::Validation("Invalid profile ID".to_string()))?;

    let repo = ProfileRepository::new(state.db.pool.clone());
    let profile = repo
        .find_by_id(&profile_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    ensure_owner(&identity, profile.user_id, "delete this profile")?;

    repo.delete(&profile_id)?;

    Ok(Json(serde_json::json!({
        "message": "Profile deleted successfully",
        "profile_id": profile_id
    })))
}

/// POST /profiles/:id/upload-image - Replace the profile picture reference
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<String>,
    Json(payload): Json<UploadImageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = authenticate(&headers, Access::Write)?;

    let profile_id = Uuid::parse_str(&profile_id)
        .map_err(|_| ApiError::Validation("Invalid profile ID".to_string()))?;

    let repo = ProfileRepository::new(state.db.pool.clone());
    let profile = repo
        .find_by_id(&profile_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    ensure_owner(&identity, profile.user_id, "change this profile picture")?;

    let key = media::image_key(
        &state.media.upload_root,
        "profiles",
        &profile.full_name(),
        &payload.filename,
    );
    repo.set_picture(&profile_id, &key)?;

    Ok(Json(serde_json::json!({
        "id": profile_id,
        "profile_picture": key
    })))
}
