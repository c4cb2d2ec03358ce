//! Process-local store with the same semantics as the relational backend.
//!
//! Messages live in one insertion-ordered vector and are listed in that
//! order. `created_at` is informational and never used for ordering.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PersistError, Result};
use crate::models::{Conversation, DBMessage, Sender};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Tables {
    conversations: HashMap<Uuid, Conversation>,
    messages: Vec<DBMessage>,
}

#[derive(Default)]
pub struct InMemoryPersistenceClient {
    tables: RwLock<Tables>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations
    pub async fn conversation_count(&self) -> usize {
        self.tables.read().await.conversations.len()
    }

    /// Number of stored messages across all conversations
    pub async fn message_count(&self) -> usize {
        self.tables.read().await.messages.len()
    }
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    async fn create_conversation(&self) -> Result<Conversation> {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        self.tables
            .write()
            .await
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn append_message(
        &self,
        conversation_id: Uuid,
        sender: Sender,
        text: &str,
    ) -> Result<DBMessage> {
        let mut tables = self.tables.write().await;
        if !tables.conversations.contains_key(&conversation_id) {
            return Err(PersistError::ConversationNotFound(conversation_id));
        }

        let message = DBMessage {
            id: Uuid::new_v4(),
            conversation_id,
            sender,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<DBMessage>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<DBMessage> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();

        if let Some(limit) = limit {
            let keep = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
            let skip = messages.len().saturating_sub(keep);
            messages.drain(..skip);
        }
        Ok(messages)
    }

    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.conversations.remove(&conversation_id).is_some() {
            tables.messages.retain(|m| m.conversation_id != conversation_id);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
