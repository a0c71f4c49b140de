//! Value objects - Immutable objects defined by their attributes

mod catalog;
mod geo;
mod gradient;
mod ids;
mod rarity;
mod resources;

pub use catalog::{EffectSpec, FlorbCatalog, GatheringProfile, RarityTier};
pub use geo::GeoPosition;
pub use gradient::{GradientConfig, GradientDirection};
pub use ids::*;
pub use rarity::{RarityLevel, RarityWeights, SpecialEffect};
pub use resources::{ResourceBundle, ResourceType};
