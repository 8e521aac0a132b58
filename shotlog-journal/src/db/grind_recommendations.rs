//! Per-bean grind recommendation cache table
//!
//! Keyed JSON store: at most one payload per bean, overwritten wholesale.
//! Payload interpretation (including corrupt-row handling) lives in the
//! repository layer.

use chrono::{DateTime, Utc};
use shotlog_common::db::parse_uuid;
use shotlog_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn upsert(
    pool: &SqlitePool,
    bean_id: Uuid,
    payload: &str,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO grind_recommendations (bean_id, payload, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(bean_id) DO UPDATE SET
            payload = excluded.payload,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(bean_id.to_string())
    .bind(payload)
    .bind(updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_payload(pool: &SqlitePool, bean_id: Uuid) -> Result<Option<String>> {
    let payload =
        sqlx::query_scalar("SELECT payload FROM grind_recommendations WHERE bean_id = ?")
            .bind(bean_id.to_string())
            .fetch_optional(pool)
            .await?;

    Ok(payload)
}

pub async fn delete(pool: &SqlitePool, bean_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM grind_recommendations WHERE bean_id = ?")
        .bind(bean_id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_all(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM grind_recommendations")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn bean_ids(pool: &SqlitePool) -> Result<Vec<Uuid>> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT bean_id FROM grind_recommendations ORDER BY bean_id")
            .fetch_all(pool)
            .await?;

    ids.iter().map(|id| parse_uuid(id)).collect()
}
