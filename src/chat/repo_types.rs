use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One exchange with the responder. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub user_message: String,
    pub bot_response: String,
    pub query_type: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChatMessage {
    pub user_message: String,
    pub bot_response: String,
    pub query_type: Option<String>,
}
