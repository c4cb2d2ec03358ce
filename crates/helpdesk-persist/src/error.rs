use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PersistError {
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "postgres")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Invalid sender tag: {0}")]
    InvalidSender(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
