use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::{
    error::ApiError,
    profile::repo_types::{NewProfile, UserProfile},
    state::AppState,
};

/// Resolves the demo profile the request acts on, creating it on first use.
pub struct CurrentUser(pub UserProfile);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let demo = &state.config.demo_user;
        let new = NewProfile::demo(&demo.email, &demo.name, demo.age);
        let profile = state.store.get_or_create_profile(&new).await?;
        debug!(user_id = %profile.id, email = %profile.email, "current user resolved");
        Ok(CurrentUser(profile))
    }
}
