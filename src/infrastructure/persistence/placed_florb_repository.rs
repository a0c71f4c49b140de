//! Placed florb repository implementation for SQLite
//!
//! The florb snapshot is stored as JSON next to the placement columns.
//! Expiry is kept as epoch milliseconds so the sweep compares integers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::application::ports::outbound::PlacedFlorbRepositoryPort;
use crate::domain::entities::{FlorbSnapshot, PlacedFlorb};
use crate::domain::value_objects::{GeoPosition, PlacedFlorbId, ResourceBundle, UserId};

const PLACED_COLUMNS: &str = "id, user_id, florb, latitude, longitude, placed_at, \
     gathering_radius, duration_hours, effectiveness, last_gathered, \
     gathered_crystal, gathered_energy, gathered_metal";

/// Repository for florbs placed on the world map
#[derive(Clone)]
pub struct SqlitePlacedFlorbRepository {
    pool: SqlitePool,
}

impl SqlitePlacedFlorbRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlacedFlorbRepositoryPort for SqlitePlacedFlorbRepository {
    async fn create(&self, placed: &PlacedFlorb) -> Result<()> {
        let florb_json = serde_json::to_string(&placed.florb)?;
        let total = placed.total_gathered;

        sqlx::query(
            "INSERT INTO placed_florbs (id, user_id, florb_id, florb, latitude, longitude,
                placed_at, gathering_radius, duration_hours, effectiveness, expires_at_ms,
                last_gathered, gathered_crystal, gathered_energy, gathered_metal)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(placed.id.to_string())
        .bind(placed.user_id.to_string())
        .bind(placed.florb.florb_id.to_string())
        .bind(florb_json)
        .bind(placed.position.latitude)
        .bind(placed.position.longitude)
        .bind(placed.placed_at)
        .bind(placed.gathering_radius)
        .bind(placed.duration_hours)
        .bind(placed.effectiveness)
        .bind(placed.expires_at().timestamp_millis())
        .bind(placed.last_gathered)
        .bind(total.map(|t| t.crystal))
        .bind(total.map(|t| t.energy))
        .bind(total.map(|t| t.metal))
        .execute(&self.pool)
        .await
        .context("Failed to insert placed florb")?;

        tracing::debug!("Placed florb {} for user {}", placed.florb.code, placed.user_id);
        Ok(())
    }

    async fn get(&self, id: PlacedFlorbId) -> Result<Option<PlacedFlorb>> {
        let sql = format!("SELECT {} FROM placed_florbs WHERE id = ?", PLACED_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_placed).transpose()
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<PlacedFlorb>> {
        let sql = format!(
            "SELECT {} FROM placed_florbs WHERE user_id = ? ORDER BY placed_at, rowid",
            PLACED_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_placed).collect()
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM placed_florbs WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count)?)
    }

    async fn update_for_user(&self, user_id: UserId, placements: &[PlacedFlorb]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0u64;
        for placed in placements {
            let total = placed.total_gathered;
            let result = sqlx::query(
                "UPDATE placed_florbs
                SET latitude = ?, longitude = ?, last_gathered = ?,
                    gathered_crystal = ?, gathered_energy = ?, gathered_metal = ?
                WHERE id = ? AND user_id = ?",
            )
            .bind(placed.position.latitude)
            .bind(placed.position.longitude)
            .bind(placed.last_gathered)
            .bind(total.map(|t| t.crystal))
            .bind(total.map(|t| t.energy))
            .bind(total.map(|t| t.metal))
            .bind(placed.id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update placed florb {}", placed.id))?;
            updated += result.rows_affected();
        }
        tx.commit().await?;

        tracing::debug!("Updated {} placed florbs for user {}", updated, user_id);
        Ok(usize::try_from(updated)?)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let result = sqlx::query("DELETE FROM placed_florbs WHERE expires_at_ms <= ?")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected())?)
    }
}

fn row_to_placed(row: &SqliteRow) -> Result<PlacedFlorb> {
    let id_str: String = row.try_get("id")?;
    let user_id_str: String = row.try_get("user_id")?;
    let florb_json: String = row.try_get("florb")?;
    let crystal: Option<f64> = row.try_get("gathered_crystal")?;
    let energy: Option<f64> = row.try_get("gathered_energy")?;
    let metal: Option<f64> = row.try_get("gathered_metal")?;

    let id = uuid::Uuid::parse_str(&id_str)
        .with_context(|| format!("Invalid placed florb id: {}", id_str))?;
    let user_id = uuid::Uuid::parse_str(&user_id_str)
        .with_context(|| format!("Invalid user id: {}", user_id_str))?;
    let florb: FlorbSnapshot = serde_json::from_str(&florb_json)?;
    let total_gathered = match (crystal, energy, metal) {
        (Some(crystal), Some(energy), Some(metal)) => {
            Some(ResourceBundle::new(crystal, energy, metal))
        }
        _ => None,
    };

    Ok(PlacedFlorb {
        id: PlacedFlorbId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        florb,
        position: GeoPosition {
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        },
        placed_at: row.try_get("placed_at")?,
        gathering_radius: row.try_get("gathering_radius")?,
        duration_hours: row.try_get("duration_hours")?,
        effectiveness: row.try_get("effectiveness")?,
        last_gathered: row.try_get("last_gathered")?,
        total_gathered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Florb;
    use crate::domain::services::GeneratedFlorb;
    use crate::domain::value_objects::{
        FlorbCode, GatheringProfile, GradientConfig, GradientDirection, RarityLevel,
        SpecialEffect,
    };
    use crate::infrastructure::persistence::SqliteRepository;
    use chrono::Duration;

    fn florb() -> Florb {
        Florb::from_generated(
            GeneratedFlorb {
                code: FlorbCode::from_stored("florb_1111111111111111"),
                name: "Rare Florb".to_string(),
                rarity: RarityLevel::new("Rare"),
                special_effects: vec![SpecialEffect::new("Shimmer")],
                gradient: GradientConfig {
                    colors: vec!["#4A7C59".into(), "#5B8C6B".into(), "#6C9C7D".into()],
                    direction: GradientDirection::Vertical,
                    intensity: 0.59,
                },
                description: "A rare rarity florb with shimmer effects.".to_string(),
                tags: vec!["rare".into(), "shimmer".into()],
            },
            "orb.png",
        )
    }

    fn placement(user: UserId, duration_hours: f64) -> PlacedFlorb {
        PlacedFlorb::new(
            user,
            &florb(),
            GeoPosition::new(48.85, 2.35).unwrap(),
            GatheringProfile {
                radius: 100.0,
                duration_hours,
                throughput_multiplier: 1.0,
            },
        )
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let repo = SqliteRepository::in_memory().await.unwrap().placed_florbs();
        let placed = placement(UserId::new(), 4.0);

        repo.create(&placed).await.unwrap();

        assert_eq!(repo.get(placed.id).await.unwrap(), Some(placed.clone()));
        assert!(repo.get(PlacedFlorbId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_requires_matching_owner() {
        let repo = SqliteRepository::in_memory().await.unwrap().placed_florbs();
        let owner = UserId::new();
        let mut placed = placement(owner, 4.0);
        repo.create(&placed).await.unwrap();

        placed.last_gathered = Some(Utc::now());
        placed.total_gathered = Some(ResourceBundle::new(0.5, 1.5, 2.5));

        assert_eq!(repo.update_for_user(UserId::new(), &[placed.clone()]).await.unwrap(), 0);
        assert_eq!(repo.update_for_user(owner, &[placed.clone()]).await.unwrap(), 1);
        assert_eq!(repo.get(placed.id).await.unwrap(), Some(placed));
    }

    #[tokio::test]
    async fn test_list_and_count_by_user() {
        let repo = SqliteRepository::in_memory().await.unwrap().placed_florbs();
        let user = UserId::new();
        repo.create(&placement(user, 1.0)).await.unwrap();
        repo.create(&placement(user, 2.0)).await.unwrap();
        repo.create(&placement(UserId::new(), 3.0)).await.unwrap();

        assert_eq!(repo.list_by_user(user).await.unwrap().len(), 2);
        assert_eq!(repo.count_by_user(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_expired_is_inclusive() {
        let repo = SqliteRepository::in_memory().await.unwrap().placed_florbs();
        let user = UserId::new();
        let short = placement(user, 1.0);
        let long = placement(user, 48.0);
        repo.create(&short).await.unwrap();
        repo.create(&long).await.unwrap();

        let just_before = short.expires_at() - Duration::milliseconds(1);
        assert_eq!(repo.delete_expired(just_before).await.unwrap(), 0);
        assert_eq!(repo.delete_expired(short.expires_at()).await.unwrap(), 1);

        let remaining = repo.list_by_user(user).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, long.id);
    }
}
