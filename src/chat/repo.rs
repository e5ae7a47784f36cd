use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::chat::repo_types::{ChatMessage, NewChatMessage};

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    new: &NewChatMessage,
) -> anyhow::Result<ChatMessage> {
    let msg = sqlx::query_as::<_, ChatMessage>(
        r#"
        INSERT INTO chat_messages (id, user_id, user_message, bot_response, query_type, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, user_message, bot_response, query_type, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&new.user_message)
    .bind(&new.bot_response)
    .bind(new.query_type.as_deref())
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
    .context("insert chat message")?;
    Ok(msg)
}

/// Newest first.
pub async fn history(db: &PgPool, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<ChatMessage>> {
    let rows = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, user_id, user_message, bot_response, query_type, created_at
          FROM chat_messages
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("chat history")?;
    Ok(rows)
}

pub async fn delete_all_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .context("delete chat history for user")?;
    Ok(done.rows_affected())
}
