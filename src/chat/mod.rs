pub mod dto;
pub mod format;
pub mod handlers;
pub mod intent;
pub mod repo;
pub mod repo_types;
pub mod responder;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::chat_routes())
}
