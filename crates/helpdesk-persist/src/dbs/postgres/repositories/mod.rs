pub mod message;
pub mod conversation;

pub use message::PgMessageRepository;
pub use conversation::PgConversationRepository;
