pub mod api;
pub mod cli;
pub mod cli_handlers;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod registry;
pub mod settings;
pub mod ws_client;

#[cfg(test)]
pub mod test_utils;
