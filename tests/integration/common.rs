//! Helpers shared by the integration tests

use assert_cmd::Command;
use nginit_cli::test_utils::TestWorkspace;
use std::fs;

/// `nginit` command isolated from the user's configuration.
///
/// An empty config file is passed with `--config` so a developer's
/// `~/.nginit/config.toml` never leaks into the tests.
pub fn nginit(ws: &TestWorkspace) -> Command {
    nginit_with_config(ws, "")
}

/// `nginit` command using a global config file with `content`.
pub fn nginit_with_config(ws: &TestWorkspace, content: &str) -> Command {
    let dir = ws.path().join(".nginit-test");
    fs::create_dir_all(&dir).unwrap();
    let config = dir.join("config.toml");
    fs::write(&config, content).unwrap();

    let mut cmd = Command::cargo_bin("nginit").unwrap();
    cmd.env_remove("NGINIT_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .current_dir(ws.path())
        .arg("--config")
        .arg(config);
    cmd
}
