//! Player resources and gathering records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{GatheringRecordId, ResourceBundle, UserId};

/// A player's current resource balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResources {
    pub user_id: UserId,
    pub balance: ResourceBundle,
    pub updated_at: DateTime<Utc>,
}

impl PlayerResources {
    /// Starting balance for a player seen for the first time
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: ResourceBundle::default(),
            updated_at: Utc::now(),
        }
    }
}

/// One gathering event, kept for analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatheringRecord {
    pub id: GatheringRecordId,
    pub user_id: UserId,
    pub gathered: ResourceBundle,
    pub timestamp: DateTime<Utc>,
}

impl GatheringRecord {
    pub fn new(user_id: UserId, gathered: ResourceBundle, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: GatheringRecordId::new(),
            user_id,
            gathered,
            timestamp,
        }
    }
}
