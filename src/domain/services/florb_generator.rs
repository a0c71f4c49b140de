//! Florb attribute generator
//!
//! Pure, stateless generation of a florb's rarity, special effects, gradient
//! overlay, description and tags. All vocabulary comes from the
//! [`FlorbCatalog`] the generator is built with; the only other input is the
//! random source, supplied per call by the caller.

use std::sync::Arc;

use rand::distributions::{Bernoulli, Distribution, WeightedIndex};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{
    FlorbCatalog, FlorbCode, GradientConfig, GradientDirection, RarityLevel, RarityWeights,
    SpecialEffect,
};

/// Lowest intensity, assigned to the most common tier before the curve
pub const INTENSITY_FLOOR: f64 = 0.2;
/// Sub-linear curve applied to the rescaled rank
pub const INTENSITY_EXPONENT: f64 = 0.7;
/// Colors drawn from a palette when no custom colors are given; clamped to
/// the palette size
pub const PALETTE_DRAW_RANGE: std::ops::RangeInclusive<usize> = 3..=5;

/// Caller-supplied constraints on a generation call
#[derive(Debug, Clone, Default)]
pub struct GenerationOverrides {
    pub rarity: Option<String>,
    /// A single effect that replaces the sampled set
    pub forced_effect: Option<String>,
    /// Used verbatim, bypassing gradient generation entirely
    pub gradient: Option<GradientConfig>,
    /// Replaces the palette draw when building a gradient
    pub custom_colors: Option<Vec<String>>,
    pub weights: Option<RarityWeights>,
}

/// The attribute bundle produced by one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFlorb {
    pub code: FlorbCode,
    pub name: String,
    pub rarity: RarityLevel,
    pub special_effects: Vec<SpecialEffect>,
    pub gradient: GradientConfig,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FlorbGenerator {
    catalog: Arc<FlorbCatalog>,
}

impl FlorbGenerator {
    pub fn new(catalog: Arc<FlorbCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FlorbCatalog {
        &self.catalog
    }

    /// Draw a rarity tier, using the catalog's default weights when none are given
    ///
    /// Draws land in `[0, total)` and are located in the cumulative weights,
    /// so every draw maps to a tier with positive weight.
    pub fn sample_rarity<R: Rng + ?Sized>(
        &self,
        weights: Option<&RarityWeights>,
        rng: &mut R,
    ) -> Result<RarityLevel, ValidationError> {
        let defaults;
        let weights = match weights {
            Some(weights) => {
                self.check_weights(weights)?;
                weights
            }
            None => {
                defaults = self.catalog.default_weights()?;
                &defaults
            }
        };

        let distribution = WeightedIndex::<f64>::new(weights.entries().iter().map(|(_, w)| *w))
            .map_err(|e| ValidationError::InvalidWeights(e.to_string()))?;

        Ok(weights.entries()[distribution.sample(rng)].0.clone())
    }

    /// One independent Bernoulli trial per catalog effect
    pub fn sample_special_effects<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<SpecialEffect>, ValidationError> {
        let mut effects = Vec::new();
        for spec in self.catalog.effects() {
            let trial = Bernoulli::new(spec.probability).map_err(|_| {
                ValidationError::InvalidCatalog(format!(
                    "effect {} has probability {} outside [0, 1]",
                    spec.name, spec.probability
                ))
            })?;
            if trial.sample(rng) {
                effects.push(SpecialEffect::new(spec.name.clone()));
            }
        }
        Ok(effects)
    }

    /// Build a gradient for a tier
    ///
    /// Custom colors are used verbatim. Otherwise 3 to 5 colors (never more
    /// than the palette holds) are drawn from the tier's palette without
    /// replacement. Intensity depends on the tier alone.
    pub fn build_gradient<R: Rng + ?Sized>(
        &self,
        rarity: &RarityLevel,
        custom_colors: Option<&[String]>,
        rng: &mut R,
    ) -> Result<GradientConfig, ValidationError> {
        let tier = self.catalog.tier(rarity)?;
        let intensity = self.intensity_for(rarity)?;

        let colors = match custom_colors {
            Some(colors) => {
                validate_custom_colors(colors)?;
                colors.to_vec()
            }
            None => {
                let requested = rng.gen_range(PALETTE_DRAW_RANGE);
                let count = requested.min(tier.palette.len());
                index::sample(rng, tier.palette.len(), count)
                    .into_iter()
                    .map(|i| tier.palette[i].clone())
                    .collect()
            }
        };

        Ok(GradientConfig {
            colors,
            direction: rng.gen::<GradientDirection>(),
            intensity,
        })
    }

    /// Deterministic intensity of a tier, see [`intensity_for_rank`]
    pub fn intensity_for(&self, rarity: &RarityLevel) -> Result<f64, ValidationError> {
        let rank = self.catalog.rank_of(rarity)?;
        Ok(intensity_for_rank(rank, self.catalog.tier_count()))
    }

    /// Generate a complete florb, honouring any overrides
    ///
    /// Every override is validated before the first random draw, so a call
    /// either fails without producing anything or returns a full bundle.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        overrides: &GenerationOverrides,
        rng: &mut R,
    ) -> Result<GeneratedFlorb, ValidationError> {
        let explicit_rarity = overrides
            .rarity
            .as_deref()
            .map(|name| self.catalog.rarity(name))
            .transpose()?;
        let forced_effect = overrides
            .forced_effect
            .as_deref()
            .map(|name| self.catalog.effect(name))
            .transpose()?;
        if let Some(gradient) = &overrides.gradient {
            gradient.validate()?;
        }
        if let Some(colors) = &overrides.custom_colors {
            validate_custom_colors(colors)?;
        }
        if let Some(weights) = &overrides.weights {
            self.check_weights(weights)?;
        }

        let rarity = match explicit_rarity {
            Some(rarity) => rarity,
            None => self.sample_rarity(overrides.weights.as_ref(), rng)?,
        };
        let special_effects = match forced_effect {
            Some(effect) => vec![effect],
            None => self.sample_special_effects(rng)?,
        };
        let gradient = match &overrides.gradient {
            Some(gradient) => gradient.clone(),
            None => self.build_gradient(&rarity, overrides.custom_colors.as_deref(), rng)?,
        };

        Ok(GeneratedFlorb {
            code: FlorbCode::generate(rng),
            name: format!("{} Florb", rarity),
            description: describe(&rarity, &special_effects),
            tags: tags_for(&rarity, &special_effects),
            rarity,
            special_effects,
            gradient,
        })
    }

    fn check_weights(&self, weights: &RarityWeights) -> Result<(), ValidationError> {
        for (rarity, _) in weights.entries() {
            self.catalog.rank_of(rarity)?;
        }
        Ok(())
    }
}

/// Intensity of the tier at `rank` in a vocabulary of `tier_count` tiers
///
/// The rank is normalised to [0, 1], rescaled to [0.2, 1.0], bent by a 0.7
/// power curve and rounded to two decimals. A single-tier vocabulary maps
/// to the floor.
pub fn intensity_for_rank(rank: usize, tier_count: usize) -> f64 {
    let normalized = if tier_count > 1 {
        rank.min(tier_count - 1) as f64 / (tier_count - 1) as f64
    } else {
        0.0
    };
    let base = INTENSITY_FLOOR + normalized * (1.0 - INTENSITY_FLOOR);
    let curved = base.powf(INTENSITY_EXPONENT);
    ((curved * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

pub fn validate_custom_colors(colors: &[String]) -> Result<(), ValidationError> {
    if colors.is_empty() || colors.iter().any(|c| c.trim().is_empty()) {
        return Err(ValidationError::EmptyCustomColors);
    }
    Ok(())
}

/// Human-readable description, e.g. "A rare rarity florb with holo, glow effects."
pub fn describe(rarity: &RarityLevel, effects: &[SpecialEffect]) -> String {
    let rarity = rarity.as_str().to_lowercase();
    if effects.is_empty() {
        return format!("A {} rarity florb with no special effects.", rarity);
    }
    let effects = effects
        .iter()
        .map(|e| e.as_str().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");
    format!("A {} rarity florb with {} effects.", rarity, effects)
}

/// Lower-cased rarity followed by lower-cased effect names
pub fn tags_for(rarity: &RarityLevel, effects: &[SpecialEffect]) -> Vec<String> {
    std::iter::once(rarity.as_str().to_lowercase())
        .chain(effects.iter().map(|e| e.as_str().to_lowercase()))
        .collect()
}
