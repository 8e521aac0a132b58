//! Bean table operations

use shotlog_common::db::{parse_date, parse_timestamp, parse_uuid};
use shotlog_common::models::Bean;
use shotlog_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn map_bean(row: &SqliteRow) -> Result<Bean> {
    let id: String = row.try_get("id")?;
    let roast_date: String = row.try_get("roast_date")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Bean {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        roast_date: parse_date(&roast_date)?,
        notes: row.try_get("notes")?,
        active: row.try_get("active")?,
        last_grinder_setting: row.try_get("last_grinder_setting")?,
        photo_path: row.try_get("photo_path")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

pub async fn insert(pool: &SqlitePool, bean: &Bean) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO beans (id, name, roast_date, notes, active, last_grinder_setting, photo_path, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(bean.id.to_string())
    .bind(&bean.name)
    .bind(bean.roast_date.format("%Y-%m-%d").to_string())
    .bind(&bean.notes)
    .bind(bean.active)
    .bind(&bean.last_grinder_setting)
    .bind(&bean.photo_path)
    .bind(bean.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update(pool: &SqlitePool, bean: &Bean) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE beans
        SET name = ?, roast_date = ?, notes = ?, active = ?,
            last_grinder_setting = ?, photo_path = ?
        WHERE id = ?
        "#,
    )
    .bind(&bean.name)
    .bind(bean.roast_date.format("%Y-%m-%d").to_string())
    .bind(&bean.notes)
    .bind(bean.active)
    .bind(&bean.last_grinder_setting)
    .bind(&bean.photo_path)
    .bind(bean.id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_active(pool: &SqlitePool, id: Uuid, active: bool) -> Result<()> {
    sqlx::query("UPDATE beans SET active = ? WHERE id = ?")
        .bind(active)
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn set_last_grinder_setting(pool: &SqlitePool, id: Uuid, setting: &str) -> Result<()> {
    sqlx::query("UPDATE beans SET last_grinder_setting = ? WHERE id = ?")
        .bind(setting)
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Option<Bean>> {
    let row = sqlx::query("SELECT * FROM beans WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_bean).transpose()
}

/// Case-sensitive exact name lookup (the uniqueness probe).
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Bean>> {
    let row = sqlx::query("SELECT * FROM beans WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_bean).transpose()
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Bean>> {
    let rows = sqlx::query("SELECT * FROM beans ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_bean).collect()
}

pub async fn list_active(pool: &SqlitePool) -> Result<Vec<Bean>> {
    let rows = sqlx::query("SELECT * FROM beans WHERE active = 1 ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_bean).collect()
}

/// Delete a bean with its dependent rows in one transaction: the shots'
/// recommendation rows, the shots, the cached grind recommendation, then
/// the bean itself. Order matters under enforced foreign keys.
pub async fn delete_cascade(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let id = id.to_string();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM shot_recommendations WHERE bean_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM shots WHERE bean_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM grind_recommendations WHERE bean_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM beans WHERE id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
