use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chat::repo_types::ChatMessage;

const DEFAULT_HISTORY: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    /// Trimmed message, `None` when missing or blank.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub response: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

impl HistoryQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_HISTORY)
            .max(0)
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub messages: Vec<ChatMessage>,
}
