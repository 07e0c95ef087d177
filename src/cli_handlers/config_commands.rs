use crate::api::validate_key;
use crate::cli::ConfigCommands;
use crate::cli_handlers::utils::print_json;
use crate::error::Result;
use crate::settings::{
    data_dir, open_settings, set_server_address, settings_delete, settings_get, settings_list,
    settings_set, SERVER_ADDRESS_KEY,
};
use serde_json::json;
use sqlx::SqlitePool;

/// Settings key holding the default command encryption key.
pub const MESH_KEY: &str = "mesh.key";

/// Keys whose values should be masked in output
fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.ends_with(".key") || lower.contains("secret")
}

/// Mask a sensitive value for display: show first 4 chars + ********
fn mask_value(value: &str) -> String {
    if value.len() <= 4 || !value.is_char_boundary(4) {
        "********".to_string()
    } else {
        format!("{}...********", &value[..4])
    }
}

fn display_value(key: &str, value: &str) -> String {
    if is_sensitive_key(key) {
        mask_value(value)
    } else {
        value.to_string()
    }
}

/// Store a setting, rejecting values the client could never use.
async fn set_checked(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    match key {
        SERVER_ADDRESS_KEY => set_server_address(pool, value).await,
        MESH_KEY => {
            validate_key(value.trim())?;
            settings_set(pool, key, value.trim()).await
        },
        _ => settings_set(pool, key, value).await,
    }
}

/// Handle all `garden config` subcommands
pub async fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    let pool = open_settings(&data_dir()?).await?;

    match cmd {
        ConfigCommands::Set { key, value, format } => {
            set_checked(&pool, &key, &value).await?;

            let shown = display_value(&key, &value);
            if format == "json" {
                print_json(&json!({ "key": key, "value": shown, "set": true }))?;
            } else {
                println!("Set {} = {}", key, shown);
            }
        },

        ConfigCommands::Get { key, format } => {
            let value = settings_get(&pool, &key).await?;
            let shown = value.as_deref().map(|v| display_value(&key, v));

            if format == "json" {
                print_json(&json!({ "key": key, "value": shown }))?;
            } else {
                match shown {
                    Some(v) => println!("{} = {}", key, v),
                    None => println!("{}: (not set)", key),
                }
            }
        },

        ConfigCommands::List { prefix, format } => {
            let entries = settings_list(&pool, prefix.as_deref()).await?;

            if format == "json" {
                let items: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|(k, v)| json!({ "key": k, "value": display_value(k, v) }))
                    .collect();
                print_json(&json!({ "config": items }))?;
            } else if entries.is_empty() {
                println!("No settings found.");
            } else {
                for (key, value) in &entries {
                    println!("{} = {}", key, display_value(key, value));
                }
            }
        },

        ConfigCommands::Unset { key, format } => {
            let deleted = settings_delete(&pool, &key).await?;

            if format == "json" {
                print_json(&json!({ "key": key, "deleted": deleted }))?;
            } else if deleted {
                println!("Unset {}", key);
            } else {
                println!("{}: (not found)", key);
            }
        },
    }

    Ok(())
}
