//! Florb repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Executor, Row, Sqlite};

use crate::application::ports::outbound::FlorbRepositoryPort;
use crate::domain::entities::Florb;
use crate::domain::value_objects::{
    FlorbCode, FlorbId, GradientConfig, GradientDirection, RarityLevel, SpecialEffect,
};

const FLORB_COLUMNS: &str = "id, code, name, base_image_path, rarity, special_effects, \
     gradient_colors, gradient_direction, gradient_intensity, description, tags, \
     created_at, updated_at";

/// Repository for Florb operations
#[derive(Clone)]
pub struct SqliteFlorbRepository {
    pool: SqlitePool,
}

impl SqliteFlorbRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, filter: &str, value: &str) -> Result<Vec<Florb>> {
        let sql = format!(
            "SELECT {} FROM florbs WHERE {} ORDER BY created_at DESC, rowid DESC",
            FLORB_COLUMNS, filter
        );
        let rows = sqlx::query(&sql).bind(value).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_florb).collect()
    }
}

async fn insert_florb<'e, E>(executor: E, florb: &Florb) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let effects_json = serde_json::to_string(&florb.special_effects)?;
    let colors_json = serde_json::to_string(&florb.gradient.colors)?;
    let tags_json = serde_json::to_string(&florb.tags)?;

    sqlx::query(
        "INSERT INTO florbs (id, code, name, base_image_path, rarity, special_effects,
            gradient_colors, gradient_direction, gradient_intensity, description, tags,
            created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(florb.id.to_string())
    .bind(florb.code.as_str())
    .bind(florb.name.as_str())
    .bind(florb.base_image_path.as_str())
    .bind(florb.rarity.as_str())
    .bind(effects_json)
    .bind(colors_json)
    .bind(florb.gradient.direction.as_str())
    .bind(florb.gradient.intensity)
    .bind(florb.description.as_deref())
    .bind(tags_json)
    .bind(florb.created_at)
    .bind(florb.updated_at)
    .execute(executor)
    .await
    .with_context(|| format!("Failed to insert florb {}", florb.code))?;

    Ok(())
}

#[async_trait]
impl FlorbRepositoryPort for SqliteFlorbRepository {
    async fn create(&self, florb: &Florb) -> Result<()> {
        insert_florb(&self.pool, florb).await?;
        tracing::debug!("Created florb: {}", florb.code);
        Ok(())
    }

    async fn create_many(&self, florbs: &[Florb]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for florb in florbs {
            insert_florb(&mut *tx, florb).await?;
        }
        tx.commit().await?;
        tracing::debug!("Created {} florbs", florbs.len());
        Ok(())
    }

    async fn get(&self, id: FlorbId) -> Result<Option<Florb>> {
        let sql = format!("SELECT {} FROM florbs WHERE id = ?", FLORB_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_florb).transpose()
    }

    async fn get_by_code(&self, code: &FlorbCode) -> Result<Option<Florb>> {
        let sql = format!("SELECT {} FROM florbs WHERE code = ?", FLORB_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_florb).transpose()
    }

    async fn list(&self, offset: u64, limit: u64, rarity: Option<&RarityLevel>) -> Result<Vec<Florb>> {
        let sql = format!(
            "SELECT {} FROM florbs
            WHERE (?1 IS NULL OR rarity = ?1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2 OFFSET ?3",
            FLORB_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(rarity.map(|r| r.as_str()))
            .bind(i64::try_from(limit)?)
            .bind(i64::try_from(offset)?)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_florb).collect()
    }

    async fn count(&self, rarity: Option<&RarityLevel>) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM florbs WHERE (?1 IS NULL OR rarity = ?1)")
                .bind(rarity.map(|r| r.as_str()))
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count)?)
    }

    async fn update(&self, florb: &Florb) -> Result<()> {
        let effects_json = serde_json::to_string(&florb.special_effects)?;
        let colors_json = serde_json::to_string(&florb.gradient.colors)?;
        let tags_json = serde_json::to_string(&florb.tags)?;

        let result = sqlx::query(
            "UPDATE florbs
            SET name = ?, base_image_path = ?, rarity = ?, special_effects = ?,
                gradient_colors = ?, gradient_direction = ?, gradient_intensity = ?,
                description = ?, tags = ?, updated_at = ?
            WHERE id = ?",
        )
        .bind(florb.name.as_str())
        .bind(florb.base_image_path.as_str())
        .bind(florb.rarity.as_str())
        .bind(effects_json)
        .bind(colors_json)
        .bind(florb.gradient.direction.as_str())
        .bind(florb.gradient.intensity)
        .bind(florb.description.as_deref())
        .bind(tags_json)
        .bind(florb.updated_at)
        .bind(florb.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Florb not found: {}", florb.id);
        }
        tracing::debug!("Updated florb: {}", florb.code);
        Ok(())
    }

    async fn delete(&self, id: FlorbId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM florbs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        tracing::debug!("Deleted florb: {}", id);
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_rarity(&self, rarity: &RarityLevel) -> Result<Vec<Florb>> {
        self.fetch_where("rarity = ?", rarity.as_str()).await
    }

    async fn list_with_effect(&self, effect: &SpecialEffect) -> Result<Vec<Florb>> {
        self.fetch_where(
            "EXISTS (SELECT 1 FROM json_each(florbs.special_effects) WHERE json_each.value = ?)",
            effect.as_str(),
        )
        .await
    }

    async fn count_by_rarity(&self) -> Result<Vec<(RarityLevel, u64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT rarity, COUNT(*) FROM florbs GROUP BY rarity")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(rarity, count)| {
                Ok::<_, anyhow::Error>((RarityLevel::new(rarity), u64::try_from(count)?))
            })
            .collect()
    }
}

fn row_to_florb(row: &SqliteRow) -> Result<Florb> {
    let id_str: String = row.try_get("id")?;
    let code: String = row.try_get("code")?;
    let rarity: String = row.try_get("rarity")?;
    let effects_json: String = row.try_get("special_effects")?;
    let colors_json: String = row.try_get("gradient_colors")?;
    let direction: String = row.try_get("gradient_direction")?;
    let tags_json: String = row.try_get("tags")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let id = uuid::Uuid::parse_str(&id_str)
        .with_context(|| format!("Invalid florb id: {}", id_str))?;
    let special_effects: Vec<SpecialEffect> = serde_json::from_str(&effects_json)?;
    let colors: Vec<String> = serde_json::from_str(&colors_json)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)?;
    let direction: GradientDirection = direction.parse()?;

    Ok(Florb {
        id: FlorbId::from_uuid(id),
        code: FlorbCode::from_stored(code),
        name: row.try_get("name")?,
        base_image_path: row.try_get("base_image_path")?,
        rarity: RarityLevel::new(rarity),
        special_effects,
        gradient: GradientConfig {
            colors,
            direction,
            intensity: row.try_get("gradient_intensity")?,
        },
        description: row.try_get("description")?,
        tags,
        created_at,
        updated_at,
    })
}
