use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::{dto::UpdateProfileRequest, repo_types::PublicUser, AuthUser},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile))
        .route("/userUpdate", put(update_profile))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let profile = state.profiles.get_own_profile(user.user_id).await?;
    Ok(Json(profile))
}

#[instrument(skip_all, fields(user_id = user.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    let Json(payload) = payload?;
    let profile = state
        .profiles
        .update_own_profile(user.user_id, payload)
        .await?;
    Ok(Json(ProfileUpdateResponse {
        message: "User profile updated successfully",
        user: profile,
    }))
}
