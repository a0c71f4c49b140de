//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Florb, GatheringRecord, PlacedFlorb, PlayerResources, ResourceNode};
use crate::domain::value_objects::{
    FlorbCode, FlorbId, PlacedFlorbId, RarityLevel, SpecialEffect, UserId,
};

// =============================================================================
// Florb Repository Port
// =============================================================================

/// Repository port for Florb operations
#[async_trait]
pub trait FlorbRepositoryPort: Send + Sync {
    /// Create a new florb
    async fn create(&self, florb: &Florb) -> Result<()>;

    /// Create several florbs in a single transaction
    async fn create_many(&self, florbs: &[Florb]) -> Result<()>;

    /// Get a florb by ID
    async fn get(&self, id: FlorbId) -> Result<Option<Florb>>;

    /// Get a florb by its external code
    async fn get_by_code(&self, code: &FlorbCode) -> Result<Option<Florb>>;

    /// List florbs newest first, optionally restricted to one rarity
    async fn list(&self, offset: u64, limit: u64, rarity: Option<&RarityLevel>) -> Result<Vec<Florb>>;

    /// Count florbs, optionally restricted to one rarity
    async fn count(&self, rarity: Option<&RarityLevel>) -> Result<u64>;

    /// Update a florb
    async fn update(&self, florb: &Florb) -> Result<()>;

    /// Delete a florb, returning whether it existed
    async fn delete(&self, id: FlorbId) -> Result<bool>;

    /// All florbs of a rarity, newest first
    async fn list_by_rarity(&self, rarity: &RarityLevel) -> Result<Vec<Florb>>;

    /// All florbs carrying an effect, newest first
    async fn list_with_effect(&self, effect: &SpecialEffect) -> Result<Vec<Florb>>;

    /// Number of florbs per stored rarity; rarities with no florbs are absent
    async fn count_by_rarity(&self) -> Result<Vec<(RarityLevel, u64)>>;
}

// =============================================================================
// Resource Node Repository Port
// =============================================================================

/// Repository port for world map resource nodes
#[async_trait]
pub trait ResourceNodeRepositoryPort: Send + Sync {
    /// Insert or replace nodes by ID, returning how many were written
    async fn upsert_many(&self, nodes: &[ResourceNode]) -> Result<usize>;

    /// List all nodes
    async fn list(&self) -> Result<Vec<ResourceNode>>;

    /// Count all nodes
    async fn count(&self) -> Result<u64>;
}

// =============================================================================
// Placed Florb Repository Port
// =============================================================================

/// Repository port for florbs placed on the world map
#[async_trait]
pub trait PlacedFlorbRepositoryPort: Send + Sync {
    /// Create a new placement
    async fn create(&self, placed: &PlacedFlorb) -> Result<()>;

    /// Get a placement by ID
    async fn get(&self, id: PlacedFlorbId) -> Result<Option<PlacedFlorb>>;

    /// List a user's placements, oldest first
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<PlacedFlorb>>;

    /// Count a user's placements
    async fn count_by_user(&self, user_id: UserId) -> Result<u64>;

    /// Update placements owned by `user_id`, returning how many rows changed
    async fn update_for_user(&self, user_id: UserId, placements: &[PlacedFlorb]) -> Result<usize>;

    /// Delete placements that expire at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}

// =============================================================================
// Player Resources Repository Port
// =============================================================================

/// Repository port for player resource balances
#[async_trait]
pub trait PlayerResourcesRepositoryPort: Send + Sync {
    /// Get a player's balance
    async fn get(&self, user_id: UserId) -> Result<Option<PlayerResources>>;

    /// Insert or replace a player's balance
    async fn upsert(&self, resources: &PlayerResources) -> Result<()>;
}

// =============================================================================
// Gathering Repository Port
// =============================================================================

/// Repository port for gathering analytics
#[async_trait]
pub trait GatheringRepositoryPort: Send + Sync {
    /// Store a gathering record
    async fn record(&self, record: &GatheringRecord) -> Result<()>;

    /// A user's gathering records, oldest first
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<GatheringRecord>>;
}
