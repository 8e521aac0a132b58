//! Shot table operations

use chrono::{DateTime, Utc};
use shotlog_common::db::{parse_timestamp, parse_uuid};
use shotlog_common::models::{Shot, TastePrimary, TasteSecondary};
use shotlog_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn map_shot(row: &SqliteRow) -> Result<Shot> {
    let id: String = row.try_get("id")?;
    let bean_id: String = row.try_get("bean_id")?;
    let pulled_at: String = row.try_get("pulled_at")?;

    Ok(Shot {
        id: parse_uuid(&id)?,
        bean_id: parse_uuid(&bean_id)?,
        weight_in_g: row.try_get("weight_in_g")?,
        weight_out_g: row.try_get("weight_out_g")?,
        extraction_time_seconds: row.try_get("extraction_time_seconds")?,
        grinder_setting: row.try_get("grinder_setting")?,
        notes: row.try_get("notes")?,
        taste_primary: parse_taste::<TastePrimary>(row.try_get("taste_primary")?)?,
        taste_secondary: parse_taste::<TasteSecondary>(row.try_get("taste_secondary")?)?,
        pulled_at: parse_timestamp(&pulled_at)?,
    })
}

fn parse_taste<T: std::str::FromStr<Err = String>>(value: Option<String>) -> Result<Option<T>> {
    value
        .map(|s| s.parse::<T>())
        .transpose()
        .map_err(|e| Error::Database(sqlx::Error::Decode(e.into())))
}

pub async fn insert(pool: &SqlitePool, shot: &Shot) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shots (
            id, bean_id, weight_in_g, weight_out_g, extraction_time_seconds,
            grinder_setting, notes, taste_primary, taste_secondary, pulled_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(shot.id.to_string())
    .bind(shot.bean_id.to_string())
    .bind(shot.weight_in_g)
    .bind(shot.weight_out_g)
    .bind(shot.extraction_time_seconds)
    .bind(&shot.grinder_setting)
    .bind(&shot.notes)
    .bind(shot.taste_primary.map(|t| t.as_str()))
    .bind(shot.taste_secondary.map(|t| t.as_str()))
    .bind(shot.pulled_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Update the mutable-in-place fields: notes and taste feedback.
pub async fn update_feedback(
    pool: &SqlitePool,
    id: Uuid,
    notes: &str,
    taste_primary: Option<TastePrimary>,
    taste_secondary: Option<TasteSecondary>,
) -> Result<()> {
    sqlx::query(
        "UPDATE shots SET notes = ?, taste_primary = ?, taste_secondary = ? WHERE id = ?",
    )
    .bind(notes)
    .bind(taste_primary.map(|t| t.as_str()))
    .bind(taste_secondary.map(|t| t.as_str()))
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Option<Shot>> {
    let row = sqlx::query("SELECT * FROM shots WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_shot).transpose()
}

/// Newest first.
pub async fn list_for_bean(pool: &SqlitePool, bean_id: Uuid) -> Result<Vec<Shot>> {
    let rows = sqlx::query("SELECT * FROM shots WHERE bean_id = ? ORDER BY pulled_at DESC")
        .bind(bean_id.to_string())
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_shot).collect()
}

pub async fn latest_for_bean(pool: &SqlitePool, bean_id: Uuid) -> Result<Option<Shot>> {
    let row = sqlx::query("SELECT * FROM shots WHERE bean_id = ? ORDER BY pulled_at DESC LIMIT 1")
        .bind(bean_id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_shot).transpose()
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Shot>> {
    let rows = sqlx::query("SELECT * FROM shots ORDER BY pulled_at DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_shot).collect()
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM shots WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_for_bean(pool: &SqlitePool, bean_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM shots WHERE bean_id = ?")
        .bind(bean_id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// Count and averages over shots matching the optional filters. Zero rows
/// yield count 0 and NULL averages, never an error. RFC 3339 timestamps in
/// UTC compare correctly as text.
pub async fn aggregate(
    pool: &SqlitePool,
    bean_id: Option<Uuid>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(i64, Option<f64>, Option<f64>, Option<f64>, Option<f64>)> {
    let bean = bean_id.map(|id| id.to_string());
    let from = from.map(|t| t.to_rfc3339());
    let to = to.map(|t| t.to_rfc3339());

    let row = sqlx::query_as::<_, (i64, Option<f64>, Option<f64>, Option<f64>, Option<f64>)>(
        r#"
        SELECT
            COUNT(*),
            AVG(weight_in_g),
            AVG(weight_out_g),
            AVG(extraction_time_seconds),
            AVG(CASE WHEN weight_in_g > 0 THEN weight_out_g / weight_in_g END)
        FROM shots
        WHERE (? IS NULL OR bean_id = ?)
          AND (? IS NULL OR pulled_at >= ?)
          AND (? IS NULL OR pulled_at <= ?)
        "#,
    )
    .bind(&bean)
    .bind(&bean)
    .bind(&from)
    .bind(&from)
    .bind(&to)
    .bind(&to)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
