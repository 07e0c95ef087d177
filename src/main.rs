use clap::Parser;
use garden_client::cli::{Cli, Commands};
use garden_client::cli_handlers::{
    handle_command_command, handle_config_command, handle_delete_command, handle_ping_command,
    handle_setup_command, handle_system_command, handle_systems_command, handle_watch_command,
};
use garden_client::error::Result;
use garden_client::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut log_config = LoggingConfig::from_args(cli.quiet, cli.verbose, cli.json);

    // A live view owns the terminal, so its logs go to a file when asked
    if let Commands::Watch {
        log_file: Some(path),
        ..
    } = &cli.command
    {
        let level = log_config.level.max(LoggingConfig::for_watch().level);
        log_config = LoggingConfig {
            level,
            json_format: cli.json,
            file_output: Some(path.clone()),
            ..LoggingConfig::for_watch()
        };
    }

    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli).await {
        let error_response = e.to_error_response();
        match serde_json::to_string_pretty(&error_response) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match cli.command.clone() {
        Commands::Setup {
            address,
            skip_check,
        } => handle_setup_command(address, skip_check).await?,

        Commands::Ping => handle_ping_command().await?,

        Commands::Systems { all, format } => handle_systems_command(all, &format).await?,

        Commands::System { id, format } => handle_system_command(&id, &format).await?,

        Commands::Watch { all, .. } => handle_watch_command(all).await?,

        Commands::Command { id, command, key } => {
            handle_command_command(&id, &command, key).await?
        },

        Commands::Delete { id } => handle_delete_command(&id).await?,

        Commands::Config(config_cmd) => handle_config_command(config_cmd).await?,
    }

    Ok(())
}
