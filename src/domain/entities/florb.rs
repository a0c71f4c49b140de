//! Florb entity - A collectible item with rarity, effects and a gradient overlay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::services::GeneratedFlorb;
use crate::domain::value_objects::{FlorbCode, FlorbId, GradientConfig, RarityLevel, SpecialEffect};

/// A stored florb
///
/// `id` is the storage identity; `code` is the opaque identifier shown to
/// players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Florb {
    pub id: FlorbId,
    pub code: FlorbCode,
    pub name: String,
    /// Path to the base image the gradient is blended over
    pub base_image_path: String,
    pub rarity: RarityLevel,
    pub special_effects: Vec<SpecialEffect>,
    pub gradient: GradientConfig,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Florb {
    /// Give a freshly generated attribute bundle a storage identity
    pub fn from_generated(generated: GeneratedFlorb, base_image_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FlorbId::new(),
            code: generated.code,
            name: generated.name,
            base_image_path: base_image_path.into(),
            rarity: generated.rarity,
            special_effects: generated.special_effects,
            gradient: generated.gradient,
            description: Some(generated.description),
            tags: generated.tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::GradientDirection;

    fn generated() -> GeneratedFlorb {
        GeneratedFlorb {
            code: FlorbCode::from_stored("florb_0123456789abcdef"),
            name: "Rare Florb".to_string(),
            rarity: RarityLevel::new("Rare"),
            special_effects: vec![SpecialEffect::new("Foil")],
            gradient: GradientConfig {
                colors: vec!["#4A7C59".into(), "#5B8C6B".into()],
                direction: GradientDirection::Horizontal,
                intensity: 0.59,
            },
            description: "A rare rarity florb with foil effects.".to_string(),
            tags: vec!["rare".into(), "foil".into()],
        }
    }

    #[test]
    fn test_from_generated_keeps_attributes() {
        let florb = Florb::from_generated(generated(), "assets/florb_base/orb.png");

        assert_eq!(florb.code.as_str(), "florb_0123456789abcdef");
        assert_eq!(florb.base_image_path, "assets/florb_base/orb.png");
        assert_eq!(florb.description.as_deref(), Some("A rare rarity florb with foil effects."));
        assert_eq!(florb.created_at, florb.updated_at);
        assert_eq!(florb.special_effects, vec![SpecialEffect::new("Foil")]);
    }

    #[test]
    fn test_florb_serialization() {
        let florb = Florb::from_generated(generated(), "orb.png");
        let json = serde_json::to_string(&florb).expect("serialization should succeed");
        assert!(json.contains("\"code\":\"florb_0123456789abcdef\""));
        assert!(json.contains("\"direction\":\"horizontal\""));

        let back: Florb = serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back, florb);
    }
}
