//! SQLite connection handling and schema setup

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS florbs (
        id TEXT PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        base_image_path TEXT NOT NULL,
        rarity TEXT NOT NULL,
        special_effects TEXT NOT NULL,
        gradient_colors TEXT NOT NULL,
        gradient_direction TEXT NOT NULL,
        gradient_intensity REAL NOT NULL,
        description TEXT,
        tags TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_florbs_rarity ON florbs (rarity)",
    "CREATE INDEX IF NOT EXISTS idx_florbs_created_at ON florbs (created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS resource_nodes (
        id TEXT PRIMARY KEY,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        resource_type TEXT NOT NULL,
        amount INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS placed_florbs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        florb_id TEXT NOT NULL,
        florb TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        placed_at TEXT NOT NULL,
        gathering_radius REAL NOT NULL,
        duration_hours REAL NOT NULL,
        effectiveness REAL NOT NULL,
        expires_at_ms INTEGER NOT NULL,
        last_gathered TEXT,
        gathered_crystal REAL,
        gathered_energy REAL,
        gathered_metal REAL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_placed_florbs_user ON placed_florbs (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_placed_florbs_expiry ON placed_florbs (expires_at_ms)",
    r#"
    CREATE TABLE IF NOT EXISTS player_resources (
        user_id TEXT PRIMARY KEY,
        crystal REAL NOT NULL,
        energy REAL NOT NULL,
        metal REAL NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gathering_records (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        crystal REAL NOT NULL,
        energy REAL NOT NULL,
        metal REAL NOT NULL,
        timestamp TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_gathering_records_user ON gathering_records (user_id)",
];

/// Open a pool for a `sqlite:` URL, creating the database file if needed
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid SQLite database URL: {}", database_url))?
        .create_if_missing(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context("Failed to create database directory")?;
        }
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to connect to SQLite database")
}

/// A private in-memory database on a single long-lived connection
pub async fn connect_in_memory() -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory SQLite database")
}

/// Create tables and indexes that do not exist yet
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA.iter().copied() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to initialize database schema")?;
    }
    tracing::debug!("Database schema initialized");
    Ok(())
}
