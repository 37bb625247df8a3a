use sqlx::Row;
use uuid::Uuid;

use crate::llm::prompts::COACH_GREETING;
use crate::models::{CoachMessage, Conversation, MessageRole};

use super::{Store, StoreError};

impl Store {
    /// Returns the user's most recently started conversation, creating one
    /// seeded with the assistant greeting when none exists.
    pub async fn get_or_create_conversation(
        &self,
        user_id: i64,
    ) -> Result<Conversation, StoreError> {
        self.ensure_user(user_id).await?;

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id
             FROM coach_conversations
             WHERE user_id = $1
             ORDER BY started_at DESC, id DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let conversation_id = match existing {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                let mut tx = self.pool.begin().await?;

                sqlx::query("INSERT INTO coach_conversations (id, user_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(
                    "INSERT INTO coach_messages (conversation_id, role, content)
                     VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(role_to_db(MessageRole::Assistant))
                .bind(COACH_GREETING)
                .execute(&mut *tx)
                .await?;

                tx.commit().await?;
                id
            }
        };

        let messages = self.list_coach_messages(conversation_id).await?;
        Ok(Conversation {
            conversation_id,
            messages,
        })
    }

    pub async fn conversation_owner(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<i64>, StoreError> {
        let owner = sqlx::query_scalar(
            "SELECT user_id
             FROM coach_conversations
             WHERE id = $1",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    pub async fn append_coach_message(
        &self,
        conversation_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<CoachMessage, StoreError> {
        let row = sqlx::query(
            "INSERT INTO coach_messages (conversation_id, role, content)
             VALUES ($1, $2, $3)
             RETURNING id, created_at",
        )
        .bind(conversation_id)
        .bind(role_to_db(role))
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(CoachMessage {
            id: row.try_get("id")?,
            role,
            content: content.to_string(),
            created_at: row.try_get("created_at")?,
        })
    }

    /// Full message history in append order.
    pub async fn list_coach_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<CoachMessage>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, role, content, created_at
             FROM coach_messages
             WHERE conversation_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(message_from_row).collect()
    }

    /// The last `limit` messages, still in append order, for use as the
    /// provider context window.
    pub async fn recent_coach_messages(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CoachMessage>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, role, content, created_at
             FROM (
                SELECT id, role, content, created_at
                FROM coach_messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
             ) AS recent
             ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(message_from_row).collect()
    }
}

fn message_from_row(row: sqlx::postgres::PgRow) -> Result<CoachMessage, StoreError> {
    let role_raw: String = row.try_get("role")?;

    Ok(CoachMessage {
        id: row.try_get("id")?,
        role: role_from_db(&role_raw)?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

fn role_to_db(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "USER",
        MessageRole::Assistant => "ASSISTANT",
    }
}

fn role_from_db(value: &str) -> Result<MessageRole, StoreError> {
    match value {
        "USER" => Ok(MessageRole::User),
        "ASSISTANT" => Ok(MessageRole::Assistant),
        _ => Err(StoreError::InvalidData(format!(
            "unknown message role persisted: {value}"
        ))),
    }
}
