//! Florb Engine - collectible florb generation and world map gathering
//!
//! The engine:
//! - Generates florbs with weighted rarity, special effects and gradients
//! - Persists florbs and world map state in SQLite
//! - Tracks placed florbs, resource nodes and player resource balances

pub mod application;
pub mod domain;
pub mod infrastructure;
