//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx SQLite connection URL
    pub database_url: String,

    /// Directory scanned for florb base images
    pub base_image_dir: PathBuf,

    /// Catalog file to load; the built-in standard catalog is used when unset
    pub catalog_path: Option<PathBuf>,

    pub world_map: WorldMapConfig,
}

#[derive(Debug, Clone)]
pub struct WorldMapConfig {
    /// Nodes generated when none are given, and seeded into an empty map
    pub initial_resource_nodes: u32,
    /// How often expired placements are swept
    pub expiry_sweep_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            database_url: lookup("FLORB_DATABASE_URL")
                .unwrap_or_else(|| "sqlite:data/florbs.db".to_string()),

            base_image_dir: lookup("FLORB_BASE_IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets/florb_base")),

            catalog_path: lookup("FLORB_CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            world_map: WorldMapConfig {
                initial_resource_nodes: lookup("FLORB_INITIAL_RESOURCE_NODES")
                    .unwrap_or_else(|| "100".to_string())
                    .parse()
                    .context("FLORB_INITIAL_RESOURCE_NODES must be a non-negative integer")?,
                expiry_sweep_interval: Duration::from_secs(
                    lookup("FLORB_EXPIRY_SWEEP_SECS")
                        .unwrap_or_else(|| "60".to_string())
                        .parse::<u64>()
                        .context("FLORB_EXPIRY_SWEEP_SECS must be a whole number of seconds")?
                        .max(1),
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:data/florbs.db");
        assert_eq!(config.base_image_dir, PathBuf::from("assets/florb_base"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.world_map.initial_resource_nodes, 100);
        assert_eq!(config.world_map.expiry_sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FLORB_DATABASE_URL", "sqlite::memory:"),
            ("FLORB_CATALOG_PATH", "catalogs/spectrum.toml"),
            ("FLORB_INITIAL_RESOURCE_NODES", "250"),
            ("FLORB_EXPIRY_SWEEP_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalogs/spectrum.toml")));
        assert_eq!(config.world_map.initial_resource_nodes, 250);
        assert_eq!(config.world_map.expiry_sweep_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        assert!(load(&[("FLORB_INITIAL_RESOURCE_NODES", "lots")]).is_err());
        assert!(load(&[("FLORB_EXPIRY_SWEEP_SECS", "-5")]).is_err());
    }
}
