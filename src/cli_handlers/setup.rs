use crate::api::{validate_address, ApiClient};
use crate::cli_handlers::utils::ClientContext;
use crate::error::{GardenError, Result};
use crate::settings::{data_dir, open_settings, set_server_address};
use dialoguer::{theme::ColorfulTheme, Input};

/// `garden setup [ADDRESS]`: store the server address, checking it first.
pub async fn handle_setup_command(address: Option<String>, skip_check: bool) -> Result<()> {
    let address = match address {
        Some(address) => address,
        None => prompt_address()?,
    };
    let address = address.trim().to_string();

    validate_address(&address)?;

    if !skip_check {
        let api = ApiClient::new(Some(address.clone()))?;
        api.ping().await?;
        println!("✓ Server at {} is reachable", address);
    }

    let pool = open_settings(&data_dir()?).await?;
    set_server_address(&pool, &address).await?;
    tracing::info!(server = %address, "Server address saved");

    println!("Server address set to {}", address);
    Ok(())
}

/// `garden ping`
pub async fn handle_ping_command() -> Result<()> {
    let ctx = ClientContext::load().await?;
    ctx.api.ping().await?;

    println!(
        "✓ Server at {} is reachable",
        ctx.api.address().unwrap_or_default()
    );
    Ok(())
}

fn prompt_address() -> Result<String> {
    println!("\n🌱 Garden setup\n");
    println!("Enter the address of the garden server, including the port.\n");

    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Server address")
        .with_initial_text("http://")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            validate_address(input).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| GardenError::InvalidInput(format!("Setup cancelled: {}", e)))
}
