use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::{MemoryStore, PgStore, Store};
use crate::config::{AppConfig, DatabaseConfig};

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Row exists but is in a state that forbids the write
    #[error("{0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} {} not found", what, id))
    }
}

/// Build a Postgres pool from configuration
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
    url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    info!("Created database pool (max_connections={})", config.max_connections);
    Ok(pool)
}

/// Open the store selected by configuration.
///
/// With `DATABASE_URL` set this is Postgres. Without it, development falls back
/// to the in-memory store and every other environment refuses to start.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>, DatabaseError> {
    match &config.database.url {
        Some(_) => {
            let pool = connect_pool(&config.database).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None if config.is_development() => {
            warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::new()))
        }
        None => Err(DatabaseError::ConfigMissing("DATABASE_URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn development_without_url_uses_memory_store() {
        let config = AppConfig::development();
        let store = open_store(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn production_requires_database_url() {
        let config = AppConfig::production();
        let err = open_store(&config).await.err().unwrap();
        assert!(matches!(err, DatabaseError::ConfigMissing("DATABASE_URL")));
    }

    #[tokio::test]
    async fn rejects_unparseable_url() {
        let mut config = AppConfig::development().database;
        config.url = Some("not a url".to_string());
        let err = connect_pool(&config).await.err().unwrap();
        assert!(matches!(err, DatabaseError::InvalidDatabaseUrl));
    }
}
