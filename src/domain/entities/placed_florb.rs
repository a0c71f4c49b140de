//! Placed florb entity - A florb put on the world map to gather resources

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Florb;
use crate::domain::value_objects::{
    FlorbCode, FlorbId, GatheringProfile, GeoPosition, GradientConfig, PlacedFlorbId,
    RarityLevel, ResourceBundle, SpecialEffect, UserId,
};

/// The florb's attributes as they were when it was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlorbSnapshot {
    pub florb_id: FlorbId,
    pub code: FlorbCode,
    pub name: String,
    pub base_image_path: String,
    pub rarity: RarityLevel,
    pub special_effects: Vec<SpecialEffect>,
    pub gradient: GradientConfig,
}

impl From<&Florb> for FlorbSnapshot {
    fn from(florb: &Florb) -> Self {
        Self {
            florb_id: florb.id,
            code: florb.code.clone(),
            name: florb.name.clone(),
            base_image_path: florb.base_image_path.clone(),
            rarity: florb.rarity.clone(),
            special_effects: florb.special_effects.clone(),
            gradient: florb.gradient.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedFlorb {
    pub id: PlacedFlorbId,
    pub user_id: UserId,
    pub florb: FlorbSnapshot,
    pub position: GeoPosition,
    pub placed_at: DateTime<Utc>,
    pub gathering_radius: f64,
    /// How long the placement keeps gathering, in hours
    pub duration_hours: f64,
    /// Throughput multiplier
    pub effectiveness: f64,
    pub last_gathered: Option<DateTime<Utc>>,
    pub total_gathered: Option<ResourceBundle>,
}

impl PlacedFlorb {
    pub fn new(
        user_id: UserId,
        florb: &Florb,
        position: GeoPosition,
        profile: GatheringProfile,
    ) -> Self {
        Self {
            id: PlacedFlorbId::new(),
            user_id,
            florb: FlorbSnapshot::from(florb),
            position,
            placed_at: Utc::now(),
            gathering_radius: profile.radius,
            duration_hours: profile.duration_hours,
            effectiveness: profile.throughput_multiplier,
            last_gathered: None,
            total_gathered: None,
        }
    }

    /// End of the gathering window, saturating at the latest representable time
    pub fn expires_at(&self) -> DateTime<Utc> {
        let millis = (self.duration_hours * 3_600_000.0).round() as i64;
        Duration::try_milliseconds(millis)
            .and_then(|duration| self.placed_at.checked_add_signed(duration))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
