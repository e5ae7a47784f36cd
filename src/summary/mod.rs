use crate::state::AppState;
use axum::Router;

pub mod aggregate;
pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::summary_routes())
}
