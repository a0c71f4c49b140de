use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::Florb;
use crate::domain::value_objects::{GradientConfig, RarityLevel};

/// Request to generate and store one florb
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateFlorbRequest {
    /// Picked at random from the base image source when absent
    #[serde(default)]
    pub base_image_path: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    /// Forces exactly this one effect
    #[serde(default)]
    pub special_effect: Option<String>,
    #[serde(default)]
    pub gradient: Option<GradientConfig>,
    #[serde(default)]
    pub custom_colors: Option<Vec<String>>,
    /// Tier name to weight; tiers left out get weight 0
    #[serde(default)]
    pub rarity_weights: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGenerateFlorbRequest {
    pub count: u32,
    /// Each florb picks one of these at random; the base image source is used when absent
    #[serde(default)]
    pub base_image_paths: Option<Vec<String>>,
    #[serde(default)]
    pub rarity_weights: Option<HashMap<String, f64>>,
}

/// Request to store a florb with caller-chosen attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFlorbRequest {
    pub name: String,
    pub base_image_path: String,
    pub rarity: String,
    #[serde(default)]
    pub special_effects: Vec<String>,
    /// Built from the rarity's palette when absent
    #[serde(default)]
    pub gradient: Option<GradientConfig>,
    #[serde(default)]
    pub custom_colors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    /// Derived from rarity and effects when empty
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFlorbRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_image_path: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub special_effects: Option<Vec<String>>,
    #[serde(default)]
    pub gradient: Option<GradientConfig>,
    /// Replaces the colors of the (possibly updated) gradient
    #[serde(default)]
    pub custom_colors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFlorbsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub rarity: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for ListFlorbsQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            rarity: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlorbPage {
    pub florbs: Vec<Florb>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityCount {
    pub rarity: RarityLevel,
    pub count: u64,
}
