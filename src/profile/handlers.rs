use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::ApiResult,
    profile::{extractors::CurrentUser, repo_types::UserProfile},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/reset", post(reset))
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: &'static str,
}

#[instrument(skip_all)]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user)
}

/// Drops the user's meals, medications and chat history. The profile stays.
#[instrument(skip_all)]
pub async fn reset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ResetResponse>> {
    let meals = state.store.clear_meals(user.id).await?;
    let medications = state.store.clear_medications(user.id).await?;
    let messages = state.store.clear_chat_history(user.id).await?;
    info!(user_id = %user.id, meals, medications, messages, "demo data reset");

    Ok(Json(ResetResponse {
        success: true,
        message: "Demo data has been reset",
    }))
}
