//! Shot recommendation table operations
//!
//! One row per shot capturing what adjustment was suggested after it and
//! whether the next shot for that bean followed the suggestion.

use shotlog_common::db::{parse_timestamp, parse_uuid};
use shotlog_common::models::{GrindAdjustment, ShotRecommendation};
use shotlog_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn map_recommendation(row: &SqliteRow) -> Result<ShotRecommendation> {
    let shot_id: String = row.try_get("shot_id")?;
    let bean_id: String = row.try_get("bean_id")?;
    let adjustment: String = row.try_get("adjustment")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(ShotRecommendation {
        shot_id: parse_uuid(&shot_id)?,
        bean_id: parse_uuid(&bean_id)?,
        adjustment: adjustment
            .parse::<GrindAdjustment>()
            .map_err(|e| Error::Database(sqlx::Error::Decode(e.into())))?,
        suggested_setting: row.try_get("suggested_setting")?,
        reason: row.try_get("reason")?,
        taste_based: row.try_get("taste_based")?,
        followed: row.try_get("followed")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Insert or overwrite the recommendation for a shot.
pub async fn upsert(pool: &SqlitePool, rec: &ShotRecommendation) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shot_recommendations (
            shot_id, bean_id, adjustment, suggested_setting, reason,
            taste_based, followed, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(shot_id) DO UPDATE SET
            bean_id = excluded.bean_id,
            adjustment = excluded.adjustment,
            suggested_setting = excluded.suggested_setting,
            reason = excluded.reason,
            taste_based = excluded.taste_based,
            followed = excluded.followed,
            created_at = excluded.created_at
        "#,
    )
    .bind(rec.shot_id.to_string())
    .bind(rec.bean_id.to_string())
    .bind(rec.adjustment.as_str())
    .bind(&rec.suggested_setting)
    .bind(&rec.reason)
    .bind(rec.taste_based)
    .bind(rec.followed)
    .bind(rec.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, shot_id: Uuid) -> Result<Option<ShotRecommendation>> {
    let row = sqlx::query("SELECT * FROM shot_recommendations WHERE shot_id = ?")
        .bind(shot_id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_recommendation).transpose()
}

pub async fn set_followed(pool: &SqlitePool, shot_id: Uuid, followed: bool) -> Result<()> {
    sqlx::query("UPDATE shot_recommendations SET followed = ? WHERE shot_id = ?")
        .bind(followed)
        .bind(shot_id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn list_for_bean(pool: &SqlitePool, bean_id: Uuid) -> Result<Vec<ShotRecommendation>> {
    let rows = sqlx::query(
        "SELECT * FROM shot_recommendations WHERE bean_id = ? ORDER BY created_at DESC",
    )
    .bind(bean_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_recommendation).collect()
}

/// (followed, evaluated) counts for a bean. Rows whose `followed` is still
/// NULL have not been evaluated against a next shot yet.
pub async fn follow_counts(pool: &SqlitePool, bean_id: Uuid) -> Result<(i64, i64)> {
    let row = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(CASE WHEN followed = 1 THEN 1 END),
            COUNT(followed)
        FROM shot_recommendations
        WHERE bean_id = ?
        "#,
    )
    .bind(bean_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
