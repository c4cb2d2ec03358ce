mod db_message;
mod db_conversation;

// Export database-agnostic models
pub use db_message::{DBMessage, Sender};
pub use db_conversation::Conversation;
