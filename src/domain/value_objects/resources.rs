//! Gatherable resources

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Kinds of resource found at resource nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Crystal,
    Energy,
    Metal,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [ResourceType::Crystal, ResourceType::Energy, ResourceType::Metal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crystal => "crystal",
            Self::Energy => "energy",
            Self::Metal => "metal",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::field("resource_type", format!("unknown resource type: {}", s)))
    }
}

impl Distribution<ResourceType> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ResourceType {
        match rng.gen_range(0..3) {
            0 => ResourceType::Crystal,
            1 => ResourceType::Energy,
            _ => ResourceType::Metal,
        }
    }
}

/// An amount of every resource type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceBundle {
    pub crystal: f64,
    pub energy: f64,
    pub metal: f64,
}

impl ResourceBundle {
    pub fn new(crystal: f64, energy: f64, metal: f64) -> Self {
        Self {
            crystal,
            energy,
            metal,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (resource, amount) in [
            (ResourceType::Crystal, self.crystal),
            (ResourceType::Energy, self.energy),
            (ResourceType::Metal, self.metal),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ValidationError::InvalidResources(format!(
                    "{} must be a finite non-negative number, got {}",
                    resource, amount
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_validation() {
        assert!(ResourceBundle::default().validate().is_ok());
        assert!(ResourceBundle::new(1.5, 0.0, 3.0).validate().is_ok());
        assert!(matches!(
            ResourceBundle::new(1.0, -2.0, 0.0).validate(),
            Err(ValidationError::InvalidResources(msg)) if msg.starts_with("energy")
        ));
        assert!(ResourceBundle::new(f64::INFINITY, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!("metal".parse::<ResourceType>().unwrap(), ResourceType::Metal);
        assert!("gold".parse::<ResourceType>().is_err());
        assert_eq!(serde_json::to_string(&ResourceType::Crystal).unwrap(), "\"crystal\"");
    }
}
