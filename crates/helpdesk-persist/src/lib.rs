pub mod models;
pub mod trait_client;
pub mod dbs;
pub mod error;
pub mod builder;

pub use models::{Conversation, DBMessage, Sender};
pub use trait_client::PersistenceClient;
pub use dbs::memory::InMemoryPersistenceClient;
#[cfg(feature = "postgres")]
pub use dbs::postgres::PostgresPersistenceClient;
pub use error::PersistError;
pub use builder::PersistClientBuilder;
