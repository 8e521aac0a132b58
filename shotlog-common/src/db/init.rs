//! Database initialization
//!
//! Creates the journal database on first run and opens it idempotently
//! afterwards: every table is `CREATE TABLE IF NOT EXISTS`, and default
//! settings are inserted only when absent.

use crate::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the journal database at the given path.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL lets the UI thread read while a background write is in flight.
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_tables(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Open a fresh in-memory database with the full schema, for tests.
///
/// Limited to one connection: each pooled connection would otherwise get
/// its own private in-memory store.
pub async fn open_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    create_tables(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_beans_table(pool).await?;
    create_shots_table(pool).await?;
    create_grinder_configs_table(pool).await?;
    create_basket_configs_table(pool).await?;
    create_shot_recommendations_table(pool).await?;
    create_grind_recommendations_table(pool).await?;
    create_settings_table(pool).await?;
    Ok(())
}

async fn create_beans_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS beans (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            roast_date TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            active INTEGER NOT NULL DEFAULT 1,
            last_grinder_setting TEXT,
            photo_path TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_beans_name ON beans(name)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_shots_table(pool: &SqlitePool) -> Result<()> {
    // The CHECK constraints are a storage-level backstop; the repository's
    // validate() is the contract the UI sees.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shots (
            id TEXT PRIMARY KEY,
            bean_id TEXT NOT NULL REFERENCES beans(id),
            weight_in_g REAL NOT NULL CHECK (weight_in_g > 0),
            weight_out_g REAL NOT NULL CHECK (weight_out_g > 0),
            extraction_time_seconds REAL NOT NULL CHECK (extraction_time_seconds >= 0),
            grinder_setting TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            taste_primary TEXT,
            taste_secondary TEXT,
            pulled_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_shots_bean_id ON shots(bean_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_shots_pulled_at ON shots(pulled_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_grinder_configs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS grinder_configs (
            id TEXT PRIMARY KEY,
            scale_min REAL NOT NULL,
            scale_max REAL NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_basket_configs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS basket_configs (
            id TEXT PRIMARY KEY,
            coffee_in_min_g REAL NOT NULL,
            coffee_in_max_g REAL NOT NULL,
            coffee_out_min_g REAL NOT NULL,
            coffee_out_max_g REAL NOT NULL,
            active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_basket_configs_active ON basket_configs(active)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_shot_recommendations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shot_recommendations (
            shot_id TEXT PRIMARY KEY REFERENCES shots(id),
            bean_id TEXT NOT NULL,
            adjustment TEXT NOT NULL,
            suggested_setting TEXT,
            reason TEXT NOT NULL,
            taste_based INTEGER NOT NULL DEFAULT 0,
            followed INTEGER,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_shot_recommendations_bean_id ON shot_recommendations(bean_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_grind_recommendations_table(pool: &SqlitePool) -> Result<()> {
    // Per-bean cache of the latest recommendation, one JSON payload per bean.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS grind_recommendations (
            bean_id TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert default settings where absent. Existing values are never
/// overwritten.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    super::settings::ensure_setting(pool, "retry_max_attempts", "3").await?;
    super::settings::ensure_setting(pool, "retry_base_delay_ms", "50").await?;
    super::settings::ensure_setting(pool, "onboarding_complete", "0").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_schema_is_complete() {
        let pool = open_in_memory().await.unwrap();

        for table in [
            "beans",
            "shots",
            "grinder_configs",
            "basket_configs",
            "shot_recommendations",
            "grind_recommendations",
            "settings",
        ] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn file_database_is_created_and_reopenable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shotlog.db");

        let pool = init_database(&path).await.unwrap();
        drop(pool);
        assert!(path.exists());

        // Second open is idempotent.
        let pool = init_database(&path).await.unwrap();
        let attempts: String =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = 'retry_max_attempts'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(attempts, "3");
    }

    #[tokio::test]
    async fn defaults_do_not_overwrite_existing_values() {
        let pool = open_in_memory().await.unwrap();
        sqlx::query("UPDATE settings SET value = '5' WHERE key = 'retry_max_attempts'")
            .execute(&pool)
            .await
            .unwrap();

        init_default_settings(&pool).await.unwrap();

        let value: String =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = 'retry_max_attempts'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(value, "5");
    }
}
