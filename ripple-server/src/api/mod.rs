pub mod comments;
pub mod error;
pub mod follows;
pub mod posts;
pub mod profiles;

pub use error::{ApiError, ApiResult};

use axum::{
    http::HeaderMap,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use ripple_types::Profile;

use crate::db::repositories::ProfileRepository;
use crate::identity::{require_identity, Identity};
use crate::policy::{self, Access};
use crate::state::AppState;

/// Request-level gate: the caller must carry an identity context and pass
/// the role policy. No route in this API is admin-gated, but the gate is
/// evaluated for every request so both policy predicates always compose.
pub(crate) fn authenticate(headers: &HeaderMap, access: Access) -> Result<Identity, ApiError> {
    let identity = require_identity(headers)?;
    if !policy::permits_request(Some(&identity), access, false) {
        return Err(ApiError::Forbidden(
            "This action requires an elevated role".to_string(),
        ));
    }
    Ok(identity)
}

/// Object-level gate: mutation requires the owning identity; admins pass.
pub(crate) fn ensure_owner(
    identity: &Identity,
    owner: Uuid,
    action: &str,
) -> Result<(), ApiError> {
    if policy::permits_object(identity, owner, Access::Write) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "You don't have permission to {action}"
        )))
    }
}

/// Resolve the caller's profile; most content operations act through it.
pub(crate) fn viewer_profile(state: &AppState, identity: &Identity) -> Result<Profile, ApiError> {
    ProfileRepository::new(state.db.pool.clone())
        .find_by_user(&identity.id)?
        .ok_or_else(|| ApiError::NotFound("No profile exists for this identity".to_string()))
}

/// The account identity that owns the given profile (for ownership checks
/// on content authored through it).
pub(crate) fn owner_identity_of(state: &AppState, profile_id: &Uuid) -> Result<Uuid, ApiError> {
    ProfileRepository::new(state.db.pool.clone())
        .find_by_id(profile_id)?
        .map(|profile| profile.user_id)
        .ok_or_else(|| ApiError::Internal("Owning profile is missing".to_string()))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Profile routes
        .route(
            "/profiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/profiles/:id",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
        .route("/profiles/:id/upload-image", post(profiles::upload_image))
        // Social graph routes
        .route(
            "/profiles/:id/follow",
            post(follows::follow_profile).delete(follows::unfollow_profile),
        )
        .route("/my_followers", get(follows::my_followers))
        .route("/my_followings", get(follows::my_followings))
        // Post routes
        .route("/posts", get(posts::get_feed).post(posts::create_post))
        .route("/posts/liked", get(posts::liked_posts))
        .route(
            "/posts/:id",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route("/posts/:id/upload-image", post(posts::upload_media))
        .route(
            "/posts/:id/like",
            post(posts::like_post).delete(posts::unlike_post),
        )
        // Comment routes
        .route(
            "/posts/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
