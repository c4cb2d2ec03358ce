use sqlx::PgPool;
use uuid::Uuid;

use crate::dbs::postgres::models::PgConversation;
use crate::error::Result;

#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a conversation; id and timestamp come from column defaults
    pub async fn create_conversation(&self) -> Result<PgConversation> {
        let row = sqlx::query_as::<_, PgConversation>(
            "INSERT INTO conversations DEFAULT VALUES RETURNING id, created_at",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a conversation; messages go with it via ON DELETE CASCADE.
    /// Returns the number of deleted conversations (0 or 1).
    pub async fn delete_conversation(&self, conversation_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
