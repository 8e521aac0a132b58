//! Basket configuration table operations

use shotlog_common::db::{parse_timestamp, parse_uuid};
use shotlog_common::models::BasketConfiguration;
use shotlog_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn map_config(row: &SqliteRow) -> Result<BasketConfiguration> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(BasketConfiguration {
        id: parse_uuid(&id)?,
        coffee_in_min_g: row.try_get("coffee_in_min_g")?,
        coffee_in_max_g: row.try_get("coffee_in_max_g")?,
        coffee_out_min_g: row.try_get("coffee_out_min_g")?,
        coffee_out_max_g: row.try_get("coffee_out_max_g")?,
        active: row.try_get("active")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

pub async fn insert(pool: &SqlitePool, config: &BasketConfiguration) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO basket_configs (
            id, coffee_in_min_g, coffee_in_max_g, coffee_out_min_g, coffee_out_max_g,
            active, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(config.id.to_string())
    .bind(config.coffee_in_min_g)
    .bind(config.coffee_in_max_g)
    .bind(config.coffee_out_min_g)
    .bind(config.coffee_out_max_g)
    .bind(config.active)
    .bind(config.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Option<BasketConfiguration>> {
    let row = sqlx::query("SELECT * FROM basket_configs WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_config).transpose()
}

/// The duplicate-range probe across all four bounds.
pub async fn find_by_range(
    pool: &SqlitePool,
    coffee_in_min_g: f64,
    coffee_in_max_g: f64,
    coffee_out_min_g: f64,
    coffee_out_max_g: f64,
) -> Result<Option<BasketConfiguration>> {
    let row = sqlx::query(
        r#"
        SELECT * FROM basket_configs
        WHERE coffee_in_min_g = ? AND coffee_in_max_g = ?
          AND coffee_out_min_g = ? AND coffee_out_max_g = ?
        "#,
    )
    .bind(coffee_in_min_g)
    .bind(coffee_in_max_g)
    .bind(coffee_out_min_g)
    .bind(coffee_out_max_g)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_config).transpose()
}

pub async fn active(pool: &SqlitePool) -> Result<Option<BasketConfiguration>> {
    let row = sqlx::query("SELECT * FROM basket_configs WHERE active = 1 LIMIT 1")
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_config).transpose()
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<BasketConfiguration>> {
    let rows = sqlx::query("SELECT * FROM basket_configs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_config).collect()
}

pub async fn deactivate_all(pool: &SqlitePool) -> Result<()> {
    sqlx::query("UPDATE basket_configs SET active = 0 WHERE active = 1")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn set_active_flag(pool: &SqlitePool, id: Uuid, active: bool) -> Result<()> {
    sqlx::query("UPDATE basket_configs SET active = ? WHERE id = ?")
        .bind(active)
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM basket_configs WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}
