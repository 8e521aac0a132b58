//! Settings table access
//!
//! Key-value store for tuning knobs and progress flags. Values are stored
//! as TEXT and parsed on read.

use crate::{Error, Result};
use sqlx::SqlitePool;
use std::fmt::Display;
use std::str::FromStr;

/// Read a setting, parsing the stored text into `T`.
pub async fn get_setting<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match value {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("setting '{}' is malformed: {}", key, e))),
        None => Ok(None),
    }
}

/// Write a setting, replacing any existing value.
pub async fn set_setting<T: Display>(pool: &SqlitePool, key: &str, value: T) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a default value only if the key is absent.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(default)
        .execute(pool)
        .await?;

    Ok(())
}
