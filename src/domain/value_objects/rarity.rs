//! Rarity tiers, special effects and sampling weights
//!
//! Names are plain strings because the vocabulary lives in a
//! [`FlorbCatalog`](super::FlorbCatalog). Values built from caller input should
//! go through the catalog lookups so unknown names are rejected.

use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// One tier of the catalog's ordered rarity vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RarityLevel(String);

impl RarityLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RarityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An optional visual flag layered onto a florb
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialEffect(String);

impl SpecialEffect {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpecialEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relative sampling weights, in tier order
///
/// Weights are finite and non-negative with a positive total. Zero weights
/// are allowed and are never drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RarityWeights {
    entries: Vec<(RarityLevel, f64)>,
}

impl RarityWeights {
    pub fn new(entries: Vec<(RarityLevel, f64)>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::InvalidWeights(
                "at least one tier is required".to_string(),
            ));
        }
        for (rarity, weight) in &entries {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ValidationError::InvalidWeights(format!(
                    "weight for {} must be a finite non-negative number, got {}",
                    rarity, weight
                )));
            }
        }
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(ValidationError::InvalidWeights(format!(
                "total weight must be positive, got {}",
                total
            )));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(RarityLevel, f64)] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn weight_of(&self, rarity: &RarityLevel) -> Option<f64> {
        self.entries
            .iter()
            .find(|(r, _)| r == rarity)
            .map(|(_, w)| *w)
    }
}
