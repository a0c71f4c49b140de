//! Player balance and gathering analytics repositories for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::application::ports::outbound::{GatheringRepositoryPort, PlayerResourcesRepositoryPort};
use crate::domain::entities::{GatheringRecord, PlayerResources};
use crate::domain::value_objects::{GatheringRecordId, ResourceBundle, UserId};

/// Repository for player resource balances
#[derive(Clone)]
pub struct SqlitePlayerResourcesRepository {
    pool: SqlitePool,
}

impl SqlitePlayerResourcesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerResourcesRepositoryPort for SqlitePlayerResourcesRepository {
    async fn get(&self, user_id: UserId) -> Result<Option<PlayerResources>> {
        let row = sqlx::query(
            "SELECT user_id, crystal, energy, metal, updated_at
            FROM player_resources
            WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok::<_, anyhow::Error>(PlayerResources {
                user_id,
                balance: row_to_bundle(&row)?,
                updated_at: row.try_get("updated_at")?,
            })
        })
        .transpose()
    }

    async fn upsert(&self, resources: &PlayerResources) -> Result<()> {
        sqlx::query(
            "INSERT INTO player_resources (user_id, crystal, energy, metal, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                crystal = excluded.crystal,
                energy = excluded.energy,
                metal = excluded.metal,
                updated_at = excluded.updated_at",
        )
        .bind(resources.user_id.to_string())
        .bind(resources.balance.crystal)
        .bind(resources.balance.energy)
        .bind(resources.balance.metal)
        .bind(resources.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to upsert player resources")?;

        tracing::debug!("Saved resources for user {}", resources.user_id);
        Ok(())
    }
}

/// Repository for gathering analytics
#[derive(Clone)]
pub struct SqliteGatheringRepository {
    pool: SqlitePool,
}

impl SqliteGatheringRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GatheringRepositoryPort for SqliteGatheringRepository {
    async fn record(&self, record: &GatheringRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO gathering_records (id, user_id, crystal, energy, metal, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.gathered.crystal)
        .bind(record.gathered.energy)
        .bind(record.gathered.metal)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .context("Failed to insert gathering record")?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<GatheringRecord>> {
        let rows = sqlx::query(
            "SELECT id, crystal, energy, metal, timestamp
            FROM gathering_records
            WHERE user_id = ?
            ORDER BY timestamp, rowid",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id_str: String = row.try_get("id")?;
                let id = uuid::Uuid::parse_str(&id_str)
                    .with_context(|| format!("Invalid gathering record id: {}", id_str))?;
                Ok::<_, anyhow::Error>(GatheringRecord {
                    id: GatheringRecordId::from_uuid(id),
                    user_id,
                    gathered: row_to_bundle(row)?,
                    timestamp: row.try_get("timestamp")?,
                })
            })
            .collect()
    }
}

fn row_to_bundle(row: &SqliteRow) -> Result<ResourceBundle> {
    Ok(ResourceBundle::new(
        row.try_get("crystal")?,
        row.try_get("energy")?,
        row.try_get("metal")?,
    ))
}
