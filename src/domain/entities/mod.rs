//! Domain entities - Core business objects with identity

mod florb;
mod placed_florb;
mod player_resources;
mod resource_node;

pub use florb::Florb;
pub use placed_florb::{FlorbSnapshot, PlacedFlorb};
pub use player_resources::{GatheringRecord, PlayerResources};
pub use resource_node::ResourceNode;
