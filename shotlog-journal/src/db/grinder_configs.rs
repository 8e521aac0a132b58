//! Grinder configuration table operations

use shotlog_common::db::{parse_timestamp, parse_uuid};
use shotlog_common::models::GrinderConfiguration;
use shotlog_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn map_config(row: &SqliteRow) -> Result<GrinderConfiguration> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(GrinderConfiguration {
        id: parse_uuid(&id)?,
        scale_min: row.try_get("scale_min")?,
        scale_max: row.try_get("scale_max")?,
        notes: row.try_get("notes")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

pub async fn insert(pool: &SqlitePool, config: &GrinderConfiguration) -> Result<()> {
    sqlx::query(
        "INSERT INTO grinder_configs (id, scale_min, scale_max, notes, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(config.id.to_string())
    .bind(config.scale_min)
    .bind(config.scale_max)
    .bind(&config.notes)
    .bind(config.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Option<GrinderConfiguration>> {
    let row = sqlx::query("SELECT * FROM grinder_configs WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_config).transpose()
}

/// The duplicate-range probe.
pub async fn find_by_range(
    pool: &SqlitePool,
    scale_min: f64,
    scale_max: f64,
) -> Result<Option<GrinderConfiguration>> {
    let row = sqlx::query("SELECT * FROM grinder_configs WHERE scale_min = ? AND scale_max = ?")
        .bind(scale_min)
        .bind(scale_max)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_config).transpose()
}

/// Newest first; the head row is the current configuration.
pub async fn list(pool: &SqlitePool) -> Result<Vec<GrinderConfiguration>> {
    let rows = sqlx::query("SELECT * FROM grinder_configs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_config).collect()
}

pub async fn latest(pool: &SqlitePool) -> Result<Option<GrinderConfiguration>> {
    let row = sqlx::query("SELECT * FROM grinder_configs ORDER BY created_at DESC LIMIT 1")
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_config).transpose()
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM grinder_configs WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}
