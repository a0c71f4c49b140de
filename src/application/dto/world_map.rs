use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ResourceNode;
use crate::domain::value_objects::{FlorbId, GeoPosition};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceFlorbRequest {
    pub florb_id: FlorbId,
    pub position: GeoPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdateResult {
    pub updated: usize,
}

/// Snapshot of every resource node on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceExport {
    pub exported_at: DateTime<Utc>,
    pub nodes: Vec<ResourceNode>,
}
