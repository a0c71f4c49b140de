//! SQLite persistence adapters
//!
//! This module implements the repository ports on top of sqlx, providing
//! storage for florbs and the world map economy.

mod connection;
mod florb_repository;
mod placed_florb_repository;
mod player_resources_repository;
mod resource_node_repository;

pub use florb_repository::SqliteFlorbRepository;
pub use placed_florb_repository::SqlitePlacedFlorbRepository;
pub use player_resources_repository::{SqliteGatheringRepository, SqlitePlayerResourcesRepository};
pub use resource_node_repository::SqliteResourceNodeRepository;

use anyhow::Result;
use sqlx::SqlitePool;

/// Combined repository providing access to all domain repositories
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = connection::connect(database_url).await?;
        Self::from_pool(pool).await
    }

    /// A throwaway database that lives as long as the repository
    pub async fn in_memory() -> Result<Self> {
        let pool = connection::connect_in_memory().await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        connection::initialize_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn florbs(&self) -> SqliteFlorbRepository {
        SqliteFlorbRepository::new(self.pool.clone())
    }

    pub fn resource_nodes(&self) -> SqliteResourceNodeRepository {
        SqliteResourceNodeRepository::new(self.pool.clone())
    }

    pub fn placed_florbs(&self) -> SqlitePlacedFlorbRepository {
        SqlitePlacedFlorbRepository::new(self.pool.clone())
    }

    pub fn player_resources(&self) -> SqlitePlayerResourcesRepository {
        SqlitePlayerResourcesRepository::new(self.pool.clone())
    }

    pub fn gathering(&self) -> SqliteGatheringRepository {
        SqliteGatheringRepository::new(self.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_initialization_is_idempotent() {
        let repository = SqliteRepository::in_memory().await.unwrap();
        let again = SqliteRepository::from_pool(repository.pool().clone()).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("florbs.db");
        let url = format!("sqlite:{}", path.display());

        let repository = SqliteRepository::new(&url).await.unwrap();
        repository.pool().close().await;
        assert!(path.exists());
    }
}
