//! Gradient overlay configuration

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Direction of the gradient overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    Horizontal,
    Vertical,
    Diagonal,
    Radial,
}

impl GradientDirection {
    pub const ALL: [GradientDirection; 4] = [
        GradientDirection::Horizontal,
        GradientDirection::Vertical,
        GradientDirection::Diagonal,
        GradientDirection::Radial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Diagonal => "diagonal",
            Self::Radial => "radial",
        }
    }
}

impl std::fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GradientDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidGradient(format!("unknown direction: {}", s)))
    }
}

/// Uniform over the four directions
impl Distribution<GradientDirection> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GradientDirection {
        match rng.gen_range(0..4) {
            0 => GradientDirection::Horizontal,
            1 => GradientDirection::Vertical,
            2 => GradientDirection::Diagonal,
            _ => GradientDirection::Radial,
        }
    }
}

/// Color, direction and blend intensity of a florb's overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientConfig {
    pub colors: Vec<String>,
    pub direction: GradientDirection,
    /// Blend intensity in [0, 1]
    pub intensity: f64,
}

impl GradientConfig {
    pub const MIN_COLORS: usize = 2;

    /// Check a caller-supplied gradient
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.colors.len() < Self::MIN_COLORS {
            return Err(ValidationError::InvalidGradient(format!(
                "gradient needs at least {} colors, got {}",
                Self::MIN_COLORS,
                self.colors.len()
            )));
        }
        if self.colors.iter().any(|c| c.trim().is_empty()) {
            return Err(ValidationError::InvalidGradient(
                "colors must not be blank".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(ValidationError::InvalidGradient(format!(
                "intensity must be within [0, 1], got {}",
                self.intensity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gradient(colors: &[&str], intensity: f64) -> GradientConfig {
        GradientConfig {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            direction: GradientDirection::Radial,
            intensity,
        }
    }

    #[test]
    fn test_gradient_validation() {
        assert!(gradient(&["#000000", "#FFFFFF"], 0.5).validate().is_ok());
        assert!(gradient(&["#000000"], 0.5).validate().is_err());
        assert!(gradient(&["#000000", " "], 0.5).validate().is_err());
        assert!(gradient(&["#000000", "#FFFFFF"], 1.2).validate().is_err());
        assert!(gradient(&["#000000", "#FFFFFF"], f64::NAN).validate().is_err());
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&GradientDirection::Diagonal).unwrap();
        assert_eq!(json, "\"diagonal\"");
        assert_eq!("Radial".parse::<GradientDirection>().unwrap(), GradientDirection::Radial);
        assert!("spiral".parse::<GradientDirection>().is_err());
    }

    #[test]
    fn test_direction_sampling_covers_all_values() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(rng.gen::<GradientDirection>());
        }
        assert_eq!(seen.len(), 4);
    }
}
