//! Common utilities for integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Path to the `garden` binary built for this test run.
pub fn garden_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_garden"))
}

/// A `garden` command whose settings live in `home`.
///
/// HOME is pointed at the same directory so nothing can fall back to the
/// real user's settings.
pub fn garden_command(home: &Path) -> Command {
    let mut cmd = Command::new(garden_binary());
    cmd.env("GARDEN_HOME", home)
        .env("HOME", home)
        .env_remove("RUST_LOG");
    cmd
}
