//! Positions on the world map

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Latitude/longitude pair, both in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let position = Self {
            latitude,
            longitude,
        };
        position.validate()?;
        Ok(position)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude) {
            Ok(())
        } else {
            Err(ValidationError::InvalidPosition {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Uniform over the whole map
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            latitude: rng.gen_range(-90.0..90.0),
            longitude: rng.gen_range(-180.0..180.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_position_bounds() {
        assert!(GeoPosition::new(90.0, -180.0).is_ok());
        assert!(GeoPosition::new(-90.5, 0.0).is_err());
        assert!(GeoPosition::new(0.0, 180.1).is_err());
        assert!(GeoPosition::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_random_positions_are_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(GeoPosition::random(&mut rng).validate().is_ok());
        }
    }
}
