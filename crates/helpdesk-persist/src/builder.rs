use std::sync::Arc;

use crate::dbs::memory::InMemoryPersistenceClient;
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// URL that selects the process-local store
pub const MEMORY_URL: &str = "memory://";

pub struct PersistClientBuilder {
    database_url: Option<String>,
    max_connections: u32,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
        }
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Pick a backend from the URL scheme: `memory://` or `postgres(ql)://`
    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        let url = self
            .database_url
            .ok_or_else(|| PersistError::Internal("database_url is required".to_string()))?;

        if url.starts_with(MEMORY_URL) {
            tracing::warn!("Using in-memory conversation store; data is lost on restart");
            return Ok(Arc::new(InMemoryPersistenceClient::new()));
        }

        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return connect_postgres(&url, self.max_connections).await;
        }

        Err(PersistError::Internal(format!(
            "Unsupported database URL scheme: {}",
            url.split("://").next().unwrap_or_default()
        )))
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(url: &str, max_connections: u32) -> Result<Arc<dyn PersistenceClient>> {
    let client = crate::dbs::postgres::PostgresPersistenceClient::connect(url, max_connections).await?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_url: &str, _max_connections: u32) -> Result<Arc<dyn PersistenceClient>> {
    Err(PersistError::Internal(
        "Postgres support requires the `postgres` feature".to_string(),
    ))
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
