//! Persistent client settings.
//!
//! A small SQLite key/value table living in the data directory
//! (`$GARDEN_HOME`, falling back to `~/.garden`). The server address is kept
//! under [`SERVER_ADDRESS_KEY`].

use crate::api::validate_address;
use crate::error::{GardenError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};

pub const SERVER_ADDRESS_KEY: &str = "server";

const DATA_DIR_ENV: &str = "GARDEN_HOME";
const DATA_DIR_NAME: &str = ".garden";
const DATABASE_FILE: &str = "client.db";

/// Resolve the data directory, honouring `GARDEN_HOME`.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let home = dirs::home_dir().ok_or_else(|| {
        GardenError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Home directory not found; set {}", DATA_DIR_ENV),
        ))
    })?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Open (creating if needed) the settings database inside `dir`.
pub async fn open_settings(dir: &Path) -> Result<SqlitePool> {
    std::fs::create_dir_all(dir)?;

    let options = SqliteConnectOptions::new()
        .filename(dir.join(DATABASE_FILE))
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn settings_set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn settings_get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

pub async fn settings_list(
    pool: &SqlitePool,
    prefix: Option<&str>,
) -> Result<Vec<(String, String)>> {
    let rows: Vec<(String, String)> = if let Some(p) = prefix {
        let pattern = format!("{}%", p);
        sqlx::query_as("SELECT key, value FROM settings WHERE key LIKE ? ORDER BY key")
            .bind(pattern)
            .fetch_all(pool)
            .await?
    } else {
        sqlx::query_as("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(pool)
            .await?
    };
    Ok(rows)
}

pub async fn settings_delete(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The configured server address, if any.
pub async fn server_address(pool: &SqlitePool) -> Result<Option<String>> {
    settings_get(pool, SERVER_ADDRESS_KEY).await
}

pub async fn set_server_address(pool: &SqlitePool, address: &str) -> Result<()> {
    validate_address(address)?;
    settings_set(pool, SERVER_ADDRESS_KEY, address.trim()).await
}
