//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapters for florbs and world map state
//! - Catalog loading from TOML or JSON files
//! - Base image discovery on the filesystem
//! - Config: Application configuration
//! - State: Shared application state
//! - Workers: Background maintenance tasks

pub mod base_images;
pub mod catalog_loader;
pub mod config;
pub mod persistence;
pub mod state;
pub mod workers;
