use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Conversation, DBMessage, Sender};

/// Trait for database persistence operations
///
/// Implementations provide database-specific CRUD operations over
/// conversations and their messages.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Create a new, empty conversation
    async fn create_conversation(&self) -> Result<Conversation>;

    /// Append a message to an existing conversation.
    ///
    /// Fails with `ConversationNotFound` when `conversation_id` does not exist.
    async fn append_message(
        &self,
        conversation_id: Uuid,
        sender: Sender,
        text: &str,
    ) -> Result<DBMessage>;

    /// Messages of a conversation in ascending creation order.
    ///
    /// With `Some(n)` only the most recent `n` are returned (still ascending).
    async fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<DBMessage>>;

    /// Delete a conversation and, by cascade, its messages. Idempotent.
    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<()>;

    /// Cheap round trip used by health checks
    async fn ping(&self) -> Result<()>;
}
