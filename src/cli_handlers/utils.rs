//! Shared state for CLI handlers.

use crate::api::ApiClient;
use crate::error::Result;
use crate::settings::{data_dir, open_settings, server_address};
use serde::Serialize;
use sqlx::SqlitePool;

/// Settings database plus an API client bound to the configured address.
pub struct ClientContext {
    pub pool: SqlitePool,
    pub api: ApiClient,
}

impl ClientContext {
    /// Open the settings store and resolve the server address.
    ///
    /// A missing address is not an error here; it surfaces on the first
    /// request made through `api`.
    pub async fn load() -> Result<Self> {
        let dir = data_dir()?;
        let pool = open_settings(&dir).await?;
        let address = server_address(&pool).await?;
        tracing::debug!("Loaded settings from {} (server: {:?})", dir.display(), address);

        let api = ApiClient::new(address)?;
        Ok(Self { pool, api })
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
