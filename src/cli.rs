use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Garden - command-line client for the garden monitoring server

Keeps a live view of every garden system (sensor unit) connected to the
server, shows their latest readings and sends them commands.

Getting started:
  garden setup http://192.168.1.10:8081   ← Store the server address
  garden systems                          ← List systems and latest readings
  garden watch                            ← Live view, updated as systems report

Configuring a system:
  garden system a1b2c3d4e5f6              ← Details and reading history
  garden command a1b2c3d4e5f6 '{"Command":"Ping"}'
  garden delete a1b2c3d4e5f6

Settings are stored in $GARDEN_HOME (default ~/.garden).
"#;

#[derive(Parser, Clone)]
#[command(name = "garden")]
#[command(about = "Garden monitoring client - live sensor readings and system configuration")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Configure the server address
    ///
    /// Prompts for the address when it is not given. The server is pinged
    /// before the address is saved unless --skip-check is passed.
    ///
    /// Examples:
    ///   garden setup http://192.168.1.10:8081
    ///   garden setup https://garden.example.org --skip-check
    Setup {
        /// Server address, e.g. http://192.168.1.10:8081
        address: Option<String>,

        /// Save the address without contacting the server
        #[arg(long)]
        skip_check: bool,
    },

    /// Check that the configured server is reachable
    Ping,

    /// List garden systems with their latest reading
    Systems {
        /// Include deleted systems
        #[arg(long)]
        all: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show one garden system and its reading history
    System {
        /// System identifier (12 hex digits)
        id: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Live view of all systems, redrawn on every update
    Watch {
        /// Include deleted systems
        #[arg(long)]
        all: bool,

        /// Write logs to this file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Send a command to a garden system
    ///
    /// Use FFFFFFFFFFFF as the identifier to address every mesh system.
    ///
    /// Examples:
    ///   garden command a1b2c3d4e5f6 '{"Command":"Ping"}'
    ///   garden command a1b2c3d4e5f6 Restart --key <64 hex digits>
    Command {
        /// System identifier (12 hex digits)
        id: String,

        /// Command payload
        command: String,

        /// Hex-encoded key; the server encrypts the command with it
        #[arg(long)]
        key: Option<String>,
    },

    /// Delete a garden system from the server
    Delete {
        /// System identifier (12 hex digits)
        id: String,
    },

    /// Settings management (key-value store)
    ///
    /// Examples:
    ///   garden config get server
    ///   garden config set server http://192.168.1.10:8081
    ///   garden config list
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Set a setting
    Set {
        /// Setting key (e.g., server)
        key: String,

        /// Setting value
        value: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Get a setting
    Get {
        /// Setting key
        key: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List settings
    List {
        /// Filter by key prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Remove a setting
    Unset {
        /// Setting key to remove
        key: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_command_with_key() {
        let cli = Cli::parse_from([
            "garden",
            "command",
            "a1b2c3d4e5f6",
            "Restart",
            "--key",
            "abcd",
        ]);
        match cli.command {
            Commands::Command { id, command, key } => {
                assert_eq!(id, "a1b2c3d4e5f6");
                assert_eq!(command, "Restart");
                assert_eq!(key.as_deref(), Some("abcd"));
            },
            _ => panic!("Expected command subcommand"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["garden", "systems", "-vv", "--all"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Systems { all: true, .. }));
    }
}
