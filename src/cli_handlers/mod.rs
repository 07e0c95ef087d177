// CLI command handlers module
//
// Server: setup, ping
// Systems: systems, system, watch, command, delete
// Settings: config

pub mod config_commands;
pub mod setup;
pub mod system_commands;
pub mod utils;
pub mod watch;

// Re-export commonly used functions
pub use config_commands::handle_config_command;
pub use setup::{handle_ping_command, handle_setup_command};
pub use system_commands::{
    handle_command_command, handle_delete_command, handle_system_command, handle_systems_command,
};
pub use utils::ClientContext;
pub use watch::handle_watch_command;
