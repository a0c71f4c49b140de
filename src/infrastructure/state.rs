//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::{
    FlorbServiceImpl, WorldMapRepositories, WorldMapService, WorldMapServiceImpl,
};
use crate::domain::value_objects::FlorbCatalog;
use crate::infrastructure::base_images::DirectoryBaseImageSource;
use crate::infrastructure::catalog_loader;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<FlorbCatalog>,
    pub repository: SqliteRepository,
    // Application services
    pub florb_service: Arc<FlorbServiceImpl>,
    pub world_map_service: Arc<WorldMapServiceImpl>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let catalog = catalog_loader::load_or_standard(config.catalog_path.as_deref())?;
        let repository = SqliteRepository::new(&config.database_url).await?;
        Ok(Self::from_parts(config, catalog, repository))
    }

    pub fn from_parts(config: AppConfig, catalog: FlorbCatalog, repository: SqliteRepository) -> Self {
        let catalog = Arc::new(catalog);
        let florbs = Arc::new(repository.florbs());

        let florb_service = Arc::new(FlorbServiceImpl::new(
            catalog.clone(),
            florbs.clone(),
            Arc::new(DirectoryBaseImageSource::new(config.base_image_dir.clone())),
        ));
        let world_map_service = Arc::new(WorldMapServiceImpl::new(
            catalog.clone(),
            WorldMapRepositories {
                florbs,
                resource_nodes: Arc::new(repository.resource_nodes()),
                placed_florbs: Arc::new(repository.placed_florbs()),
                player_resources: Arc::new(repository.player_resources()),
                gathering: Arc::new(repository.gathering()),
            },
            config.world_map.initial_resource_nodes,
        ));

        Self {
            config,
            catalog,
            repository,
            florb_service,
            world_map_service,
        }
    }

    /// Seed the world map when it has no resource nodes yet
    ///
    /// Returns the number of nodes generated.
    pub async fn ensure_resource_nodes(&self) -> Result<usize> {
        if self.world_map_service.count_resource_nodes().await? > 0
            || self.config.world_map.initial_resource_nodes == 0
        {
            return Ok(0);
        }
        let nodes = self
            .world_map_service
            .generate_resource_nodes(None)
            .await
            .context("Failed to seed resource nodes")?;
        Ok(nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::FlorbService;
    use std::collections::HashMap;

    fn config(dir: &std::path::Path, extra: &[(&str, String)]) -> AppConfig {
        let mut vars: HashMap<String, String> = HashMap::from([
            (
                "FLORB_DATABASE_URL".to_string(),
                format!("sqlite:{}", dir.join("florbs.db").display()),
            ),
            (
                "FLORB_BASE_IMAGE_DIR".to_string(),
                dir.join("images").display().to_string(),
            ),
            ("FLORB_INITIAL_RESOURCE_NODES".to_string(), "12".to_string()),
        ]);
        for (key, value) in extra {
            vars.insert(key.to_string(), value.clone());
        }
        AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_state_wires_services_and_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(dir.path(), &[])).await.unwrap();

        assert_eq!(state.catalog.name(), "standard");
        assert_eq!(state.ensure_resource_nodes().await.unwrap(), 12);
        assert_eq!(state.ensure_resource_nodes().await.unwrap(), 0);
        assert_eq!(state.world_map_service.count_resource_nodes().await.unwrap(), 12);

        let images = state.florb_service.base_images().await.unwrap();
        assert!(images[0].ends_with("default_orb.png"));
    }

    #[tokio::test]
    async fn test_state_uses_configured_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("catalogs/spectrum.toml")
            .display()
            .to_string();
        let state = AppState::new(config(dir.path(), &[("FLORB_CATALOG_PATH", catalog_path)]))
            .await
            .unwrap();

        assert_eq!(state.catalog.name(), "spectrum");
        assert_eq!(state.florb_service.rarity_levels().len(), 7);
    }
}
