use crate::state::AppState;
use axum::Router;

pub mod extractors;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::profile_routes())
}
