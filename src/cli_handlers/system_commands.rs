use crate::cli_handlers::config_commands::MESH_KEY;
use crate::cli_handlers::utils::{print_json, ClientContext};
use crate::display::{render_system_detail, render_systems, visible_systems};
use crate::error::Result;
use crate::registry::SystemRegistry;
use crate::settings::settings_get;

/// `garden systems`: snapshot of every system the server knows.
pub async fn handle_systems_command(all: bool, format: &str) -> Result<()> {
    let ctx = ClientContext::load().await?;
    let systems = ctx.api.list_systems().await?;

    let mut registry = SystemRegistry::new();
    registry.initialize(systems);

    if format == "json" {
        print_json(&visible_systems(registry.systems(), all))?;
    } else {
        print!("{}", render_systems(registry.systems(), all));
    }

    Ok(())
}

/// `garden system <id>`
pub async fn handle_system_command(id: &str, format: &str) -> Result<()> {
    let ctx = ClientContext::load().await?;
    let system = ctx.api.get_system(id).await?;

    if format == "json" {
        print_json(&system)?;
    } else {
        print!("{}", render_system_detail(&system));
    }

    Ok(())
}

/// `garden command <id> <command>`
///
/// Falls back to the `mesh.key` setting when no key is passed.
pub async fn handle_command_command(id: &str, command: &str, key: Option<String>) -> Result<()> {
    let ctx = ClientContext::load().await?;

    let key = match key {
        Some(key) => Some(key),
        None => settings_get(&ctx.pool, MESH_KEY).await?,
    };

    ctx.api.send_command(id, command, key.as_deref()).await?;

    let mode = if key.is_some() { "encrypted" } else { "plain" };
    println!("✓ Sent {} command to {}", mode, id);
    Ok(())
}

/// `garden delete <id>`
pub async fn handle_delete_command(id: &str) -> Result<()> {
    let ctx = ClientContext::load().await?;
    ctx.api.delete_system(id).await?;

    println!("✓ Deleted {}", id);
    Ok(())
}
