//! Florb catalog - the versioned rarity/effect vocabulary
//!
//! A catalog bundles everything the generator and the world map need to know
//! about a vocabulary: tier order (most common first), default sampling
//! weights, color palettes, gathering profiles and the special-effect
//! catalogue with per-effect inclusion probabilities. Switching vocabularies
//! means swapping the catalog, never touching generator logic.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{RarityLevel, RarityWeights, SpecialEffect};

/// How a placed florb of a given tier gathers resources
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatheringProfile {
    pub radius: f64,
    pub duration_hours: f64,
    pub throughput_multiplier: f64,
}

impl GatheringProfile {
    /// Longest accepted placement duration: one hundred years
    pub const MAX_DURATION_HOURS: f64 = 24.0 * 365.0 * 100.0;
}

/// One rarity tier of a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityTier {
    pub name: String,
    /// Default relative sampling weight
    pub weight: f64,
    pub palette: Vec<String>,
    pub gathering: GatheringProfile,
}

/// One entry of the special-effect catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: String,
    /// Independent inclusion probability in [0, 1]
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlorbCatalog {
    name: String,
    tiers: Vec<RarityTier>,
    #[serde(default)]
    effects: Vec<EffectSpec>,
}

const STANDARD_TIERS: [(&str, f64, &[&str], GatheringProfile); 4] = [
    (
        "Common",
        70.0,
        &["#B0B0B0", "#C0C0C0", "#D0D0D0", "#E0E0E0"],
        GatheringProfile { radius: 50.0, duration_hours: 1.0, throughput_multiplier: 0.5 },
    ),
    (
        "Rare",
        20.0,
        &["#4A7C59", "#5B8C6B", "#6B9C7B", "#7BAC8B"],
        GatheringProfile { radius: 100.0, duration_hours: 4.0, throughput_multiplier: 1.0 },
    ),
    (
        "Epic",
        8.0,
        &["#7744AA", "#8855BB", "#9966CC", "#AA77DD"],
        GatheringProfile { radius: 200.0, duration_hours: 12.0, throughput_multiplier: 2.0 },
    ),
    (
        "Legendary",
        2.0,
        &["#FF0033", "#00FF33", "#3300FF", "#FFFF00", "#FF3300", "#33FF00", "#0033FF", "#FF00FF"],
        GatheringProfile { radius: 500.0, duration_hours: 48.0, throughput_multiplier: 5.0 },
    ),
];

const STANDARD_EFFECTS: [(&str, f64); 4] = [("Holo", 0.10), ("Foil", 0.08), ("Shimmer", 0.05), ("Glow", 0.03)];

impl FlorbCatalog {
    /// The canonical four-tier vocabulary (Common, Rare, Epic, Legendary)
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            tiers: STANDARD_TIERS
                .iter()
                .map(|(name, weight, palette, gathering)| RarityTier {
                    name: name.to_string(),
                    weight: *weight,
                    palette: palette.iter().map(|c| c.to_string()).collect(),
                    gathering: *gathering,
                })
                .collect(),
            effects: STANDARD_EFFECTS
                .iter()
                .map(|(name, probability)| EffectSpec {
                    name: name.to_string(),
                    probability: *probability,
                })
                .collect(),
        }
    }

    pub fn new(
        name: impl Into<String>,
        tiers: Vec<RarityTier>,
        effects: Vec<EffectSpec>,
    ) -> Result<Self, ValidationError> {
        let catalog = Self {
            name: name.into(),
            tiers,
            effects,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every invariant the generator relies on
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |msg: String| Err(ValidationError::InvalidCatalog(msg));

        if self.tiers.is_empty() {
            return invalid("at least one rarity tier is required".to_string());
        }

        let mut tier_names = HashSet::new();
        for tier in &self.tiers {
            if tier.name.trim().is_empty() {
                return invalid("tier names must not be blank".to_string());
            }
            if !tier_names.insert(tier.name.to_lowercase()) {
                return invalid(format!("duplicate tier: {}", tier.name));
            }
            if !tier.weight.is_finite() || tier.weight < 0.0 {
                return invalid(format!("tier {} has invalid weight {}", tier.name, tier.weight));
            }
            if tier.palette.len() < 2 || tier.palette.iter().any(|c| c.trim().is_empty()) {
                return invalid(format!(
                    "tier {} needs a palette of at least 2 non-blank colors",
                    tier.name
                ));
            }
            let g = &tier.gathering;
            if [g.radius, g.duration_hours, g.throughput_multiplier]
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0)
            {
                return invalid(format!("tier {} has an invalid gathering profile", tier.name));
            }
            if g.duration_hours > GatheringProfile::MAX_DURATION_HOURS {
                return invalid(format!(
                    "tier {} lasts {} hours, more than the maximum of {}",
                    tier.name,
                    g.duration_hours,
                    GatheringProfile::MAX_DURATION_HOURS
                ));
            }
        }

        let total: f64 = self.tiers.iter().map(|t| t.weight).sum();
        if !total.is_finite() || total <= 0.0 {
            return invalid(format!("default weights must have a positive total, got {}", total));
        }

        let mut effect_names = HashSet::new();
        for effect in &self.effects {
            if effect.name.trim().is_empty() {
                return invalid("effect names must not be blank".to_string());
            }
            if !effect_names.insert(effect.name.to_lowercase()) {
                return invalid(format!("duplicate effect: {}", effect.name));
            }
            if !(0.0..=1.0).contains(&effect.probability) {
                return invalid(format!(
                    "effect {} has probability {} outside [0, 1]",
                    effect.name, effect.probability
                ));
            }
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effects(&self) -> &[EffectSpec] {
        &self.effects
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Resolve a rarity name (case-insensitive) to its canonical spelling
    pub fn rarity(&self, name: &str) -> Result<RarityLevel, ValidationError> {
        self.tiers
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .map(|t| RarityLevel::new(t.name.clone()))
            .ok_or_else(|| ValidationError::UnknownRarity(name.to_string()))
    }

    /// Resolve an effect name (case-insensitive) to its canonical spelling
    pub fn effect(&self, name: &str) -> Result<SpecialEffect, ValidationError> {
        self.effects
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .map(|e| SpecialEffect::new(e.name.clone()))
            .ok_or_else(|| ValidationError::UnknownEffect(name.to_string()))
    }

    /// Zero-based position of a tier, most common first
    pub fn rank_of(&self, rarity: &RarityLevel) -> Result<usize, ValidationError> {
        self.tiers
            .iter()
            .position(|t| t.name == rarity.as_str())
            .ok_or_else(|| ValidationError::UnknownRarity(rarity.to_string()))
    }

    pub fn tier(&self, rarity: &RarityLevel) -> Result<&RarityTier, ValidationError> {
        let rank = self.rank_of(rarity)?;
        Ok(&self.tiers[rank])
    }

    pub fn default_weights(&self) -> Result<RarityWeights, ValidationError> {
        RarityWeights::new(
            self.tiers
                .iter()
                .map(|t| (RarityLevel::new(t.name.clone()), t.weight))
                .collect(),
        )
    }

    /// Build weights from a caller-supplied name → weight map
    ///
    /// Tiers missing from the map get weight 0. Entries are laid out in tier
    /// order regardless of map order.
    pub fn weights_from_map(&self, map: &HashMap<String, f64>) -> Result<RarityWeights, ValidationError> {
        let mut weights = vec![0.0; self.tiers.len()];
        let mut seen = HashSet::new();
        for (name, weight) in map {
            let rarity = self.rarity(name)?;
            let rank = self.rank_of(&rarity)?;
            if !seen.insert(rank) {
                return Err(ValidationError::InvalidWeights(format!(
                    "rarity {} given more than once",
                    rarity
                )));
            }
            weights[rank] = *weight;
        }

        RarityWeights::new(
            self.tiers
                .iter()
                .zip(weights)
                .map(|(t, w)| (RarityLevel::new(t.name.clone()), w))
                .collect(),
        )
    }

    pub fn rarity_levels(&self) -> Vec<RarityLevel> {
        self.tiers.iter().map(|t| RarityLevel::new(t.name.clone())).collect()
    }

    pub fn special_effects(&self) -> Vec<SpecialEffect> {
        self.effects.iter().map(|e| SpecialEffect::new(e.name.clone())).collect()
    }
}

impl Default for FlorbCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str, weight: f64, palette: &[&str]) -> RarityTier {
        RarityTier {
            name: name.to_string(),
            weight,
            palette: palette.iter().map(|c| c.to_string()).collect(),
            gathering: GatheringProfile {
                radius: 10.0,
                duration_hours: 1.0,
                throughput_multiplier: 1.0,
            },
        }
    }

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = FlorbCatalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.tier_count(), 4);
        let names: Vec<_> = catalog.rarity_levels().iter().map(|r| r.to_string()).collect();
        assert_eq!(names, ["Common", "Rare", "Epic", "Legendary"]);
        assert_eq!(catalog.default_weights().unwrap().total(), 100.0);
    }

    #[test]
    fn test_lookups_are_case_insensitive_and_canonical() {
        let catalog = FlorbCatalog::standard();
        assert_eq!(catalog.rarity("legendary").unwrap().as_str(), "Legendary");
        assert_eq!(catalog.effect("HOLO").unwrap().as_str(), "Holo");
        assert_eq!(
            catalog.rarity("Mythic"),
            Err(ValidationError::UnknownRarity("Mythic".to_string()))
        );
        assert!(matches!(catalog.effect("Glitch"), Err(ValidationError::UnknownEffect(_))));
    }

    #[test]
    fn test_rank_and_gathering_profile() {
        let catalog = FlorbCatalog::standard();
        let epic = catalog.rarity("Epic").unwrap();
        assert_eq!(catalog.rank_of(&epic).unwrap(), 2);
        assert_eq!(catalog.tier(&epic).unwrap().gathering.duration_hours, 12.0);
        assert!(catalog.rank_of(&RarityLevel::new("Grey")).is_err());
    }

    #[test]
    fn test_weights_from_map_fills_missing_tiers_with_zero() {
        let catalog = FlorbCatalog::standard();
        let map = HashMap::from([("epic".to_string(), 3.0), ("Common".to_string(), 1.0)]);
        let weights = catalog.weights_from_map(&map).unwrap();

        let entries: Vec<_> = weights
            .entries()
            .iter()
            .map(|(r, w)| (r.as_str().to_string(), *w))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("Common".to_string(), 1.0),
                ("Rare".to_string(), 0.0),
                ("Epic".to_string(), 3.0),
                ("Legendary".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn test_weights_from_map_rejects_bad_input() {
        let catalog = FlorbCatalog::standard();

        let unknown = HashMap::from([("Mythic".to_string(), 1.0)]);
        assert!(matches!(
            catalog.weights_from_map(&unknown),
            Err(ValidationError::UnknownRarity(_))
        ));

        let zero = HashMap::from([("Common".to_string(), 0.0)]);
        assert!(matches!(
            catalog.weights_from_map(&zero),
            Err(ValidationError::InvalidWeights(_))
        ));

        let duplicate = HashMap::from([("Rare".to_string(), 1.0), ("rare".to_string(), 2.0)]);
        assert!(catalog.weights_from_map(&duplicate).is_err());
    }

    #[test]
    fn test_invalid_catalogs_are_rejected() {
        let palette = ["#000", "#111"];

        assert!(FlorbCatalog::new("empty", vec![], vec![]).is_err());
        assert!(FlorbCatalog::new(
            "dup",
            vec![tier("A", 1.0, &palette), tier("a", 1.0, &palette)],
            vec![]
        )
        .is_err());
        assert!(FlorbCatalog::new("zero", vec![tier("A", 0.0, &palette)], vec![]).is_err());
        assert!(FlorbCatalog::new("short", vec![tier("A", 1.0, &["#000"])], vec![]).is_err());
        assert!(FlorbCatalog::new(
            "prob",
            vec![tier("A", 1.0, &palette)],
            vec![EffectSpec {
                name: "Glow".to_string(),
                probability: 1.5,
            }]
        )
        .is_err());

        let mut endless = tier("A", 1.0, &palette);
        endless.gathering.duration_hours = 1e12;
        assert_eq!(
            FlorbCatalog::new("endless", vec![endless.clone()], vec![]).map(|_| ()),
            Err(ValidationError::InvalidCatalog(
                "tier A lasts 1000000000000 hours, more than the maximum of 876000".to_string()
            ))
        );
        endless.gathering.duration_hours = GatheringProfile::MAX_DURATION_HOURS;
        assert!(FlorbCatalog::new("century", vec![endless], vec![]).is_ok());

        let ok = FlorbCatalog::new("ok", vec![tier("A", 1.0, &palette), tier("B", 0.0, &palette)], vec![]);
        assert!(ok.is_ok());
    }
}
