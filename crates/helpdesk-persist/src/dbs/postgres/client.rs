//! Postgres implementation of [`PersistenceClient`].
//!
//! Migrations under `migrations/` are embedded at compile time and run on
//! [`PostgresPersistenceClient::connect`]. Queries use the runtime-checked
//! `sqlx::query_as` form so no `DATABASE_URL` is needed to build.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dbs::postgres::repositories::{PgConversationRepository, PgMessageRepository};
use crate::error::{PersistError, Result};
use crate::models::{Conversation, DBMessage, Sender};
use crate::trait_client::PersistenceClient;

pub struct PostgresPersistenceClient {
    pool: PgPool,
    message_repo: PgMessageRepository,
    conversation_repo: PgConversationRepository,
}

impl PostgresPersistenceClient {
    /// Connect to Postgres, run pending migrations and create client
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool; migrations are the caller's concern
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            message_repo: PgMessageRepository::new(pool.clone()),
            conversation_repo: PgConversationRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl PersistenceClient for PostgresPersistenceClient {
    async fn create_conversation(&self) -> Result<Conversation> {
        let row = self.conversation_repo.create_conversation().await?;
        Ok(row.into())
    }

    async fn append_message(
        &self,
        conversation_id: Uuid,
        sender: Sender,
        text: &str,
    ) -> Result<DBMessage> {
        let row = self
            .message_repo
            .append_message(conversation_id, sender, text)
            .await?;
        row.try_into()
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<DBMessage>> {
        let rows = self.message_repo.list_messages(conversation_id, limit).await?;
        rows.into_iter().map(DBMessage::try_from).collect()
    }

    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<()> {
        let deleted = self
            .conversation_repo
            .delete_conversation(conversation_id)
            .await?;
        tracing::debug!(%conversation_id, deleted, "Conversation delete executed");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
