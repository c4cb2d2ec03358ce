use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::PersistError;
use crate::models::{Conversation, DBMessage};

/// Row of the `conversations` table
#[derive(Debug, Clone, FromRow)]
pub struct PgConversation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Row of the `messages` table
#[derive(Debug, Clone, FromRow)]
pub struct PgMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub seq: i64,
}

// Conversions between database-agnostic and Postgres-specific models

impl From<PgConversation> for Conversation {
    fn from(row: PgConversation) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<PgMessage> for DBMessage {
    type Error = PersistError;

    fn try_from(row: PgMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender: row.sender.parse()?,
            text: row.text,
            created_at: row.created_at,
        })
    }
}
