//! Resource node entity - A deposit of one resource somewhere on the map

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{GeoPosition, ResourceNodeId, ResourceType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: ResourceNodeId,
    pub position: GeoPosition,
    pub resource_type: ResourceType,
    pub amount: u32,
}

impl ResourceNode {
    /// Largest amount a generated node can hold
    pub const MAX_GENERATED_AMOUNT: u32 = 1000;

    pub fn new(position: GeoPosition, resource_type: ResourceType, amount: u32) -> Self {
        Self {
            id: ResourceNodeId::new(),
            position,
            resource_type,
            amount,
        }
    }

    /// Random position, uniformly chosen type, amount in 1..=1000
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            GeoPosition::random(rng),
            rng.gen(),
            rng.gen_range(1..=Self::MAX_GENERATED_AMOUNT),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.position.validate()
    }
}
