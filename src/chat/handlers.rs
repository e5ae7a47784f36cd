use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    chat::{
        dto::{ChatRequest, ChatResponse, HistoryQuery, HistoryResponse},
        repo_types::NewChatMessage,
        responder::respond,
    },
    dates,
    error::{ApiError, ApiResult},
    profile::extractors::CurrentUser,
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/history", get(history))
}

#[instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    let message = body
        .text()
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;

    let reply = respond(state.store.as_ref(), &user, message, dates::today()).await?;
    let saved = state
        .store
        .append_chat_message(
            user.id,
            &NewChatMessage {
                user_message: message.to_string(),
                bot_response: reply.text,
                query_type: Some(reply.intent.as_str().to_string()),
            },
        )
        .await?;
    info!(user_id = %user.id, intent = reply.intent.as_str(), "chat answered");

    Ok(Json(ChatResponse {
        message: saved.user_message,
        response: saved.bot_response,
        timestamp: saved.created_at,
    }))
}

#[instrument(skip(state, user))]
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let messages = state.store.chat_history(user.id, q.limit()).await?;
    Ok(Json(HistoryResponse {
        count: messages.len(),
        messages,
    }))
}
