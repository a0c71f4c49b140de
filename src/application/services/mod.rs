//! Application services - Use case implementations
//!
//! This module contains the application services that implement the use cases
//! for the Florb Engine. Each service follows hexagonal architecture principles,
//! accepting repository ports and returning domain entities or DTOs.

pub mod florb_service;
pub mod world_map_service;

pub use florb_service::{FlorbService, FlorbServiceImpl};
pub use world_map_service::{WorldMapRepositories, WorldMapService, WorldMapServiceImpl};
