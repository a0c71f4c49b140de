//! Resource node repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::application::ports::outbound::ResourceNodeRepositoryPort;
use crate::domain::entities::ResourceNode;
use crate::domain::value_objects::{GeoPosition, ResourceNodeId, ResourceType};

/// Repository for world map resource nodes
#[derive(Clone)]
pub struct SqliteResourceNodeRepository {
    pool: SqlitePool,
}

impl SqliteResourceNodeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceNodeRepositoryPort for SqliteResourceNodeRepository {
    async fn upsert_many(&self, nodes: &[ResourceNode]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        for node in nodes {
            let result = sqlx::query(
                "INSERT INTO resource_nodes (id, latitude, longitude, resource_type, amount)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    resource_type = excluded.resource_type,
                    amount = excluded.amount",
            )
            .bind(node.id.to_string())
            .bind(node.position.latitude)
            .bind(node.position.longitude)
            .bind(node.resource_type.as_str())
            .bind(i64::from(node.amount))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert resource node {}", node.id))?;
            written += result.rows_affected();
        }
        tx.commit().await?;

        tracing::debug!("Upserted {} resource nodes", written);
        Ok(usize::try_from(written)?)
    }

    async fn list(&self) -> Result<Vec<ResourceNode>> {
        let rows = sqlx::query(
            "SELECT id, latitude, longitude, resource_type, amount
            FROM resource_nodes
            ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_node).collect()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resource_nodes")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count)?)
    }
}

fn row_to_node(row: &SqliteRow) -> Result<ResourceNode> {
    let id_str: String = row.try_get("id")?;
    let resource_type: String = row.try_get("resource_type")?;
    let amount: i64 = row.try_get("amount")?;

    let id = uuid::Uuid::parse_str(&id_str)
        .with_context(|| format!("Invalid resource node id: {}", id_str))?;
    let resource_type: ResourceType = resource_type.parse()?;

    Ok(ResourceNode {
        id: ResourceNodeId::from_uuid(id),
        position: GeoPosition {
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        },
        resource_type,
        amount: u32::try_from(amount)
            .with_context(|| format!("Invalid resource amount: {}", amount))?,
    })
}
