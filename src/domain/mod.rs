//! Domain layer - Core business logic with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: Florb, PlacedFlorb, ResourceNode, PlayerResources
//! - Value Objects: the florb catalog, rarity, gradients, positions, ids
//! - Domain Services: the florb attribute generator
//! - Errors: validation failures shared by all of the above

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
