use sqlx::PgPool;
use uuid::Uuid;

use crate::dbs::postgres::models::PgMessage;
use crate::error::{PersistError, Result};
use crate::models::Sender;

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single message
    pub async fn append_message(
        &self,
        conversation_id: Uuid,
        sender: Sender,
        text: &str,
    ) -> Result<PgMessage> {
        let inserted = sqlx::query_as::<_, PgMessage>(
            "INSERT INTO messages (conversation_id, sender, text) \
             VALUES ($1, $2, $3) \
             RETURNING id, conversation_id, sender, text, created_at, seq",
        )
        .bind(conversation_id)
        .bind(sender.as_str())
        .bind(text)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(PersistError::ConversationNotFound(conversation_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent `limit` messages (all when `None`), oldest first.
    ///
    /// `LIMIT NULL` is `LIMIT ALL` in Postgres, so one statement covers both.
    pub async fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<PgMessage>> {
        let rows = sqlx::query_as::<_, PgMessage>(
            "SELECT id, conversation_id, sender, text, created_at, seq FROM ( \
                 SELECT id, conversation_id, sender, text, created_at, seq \
                 FROM messages \
                 WHERE conversation_id = $1 \
                 ORDER BY created_at DESC, seq DESC \
                 LIMIT $2 \
             ) recent \
             ORDER BY created_at ASC, seq ASC",
        )
        .bind(conversation_id)
        .bind(limit.map(|l| l.max(0)))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
