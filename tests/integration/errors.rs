//! Error reporting for malformed workspaces

use nginit_cli::test_utils::TestWorkspace;
use predicates::prelude::*;

use super::common::{nginit, nginit_with_config};

#[test]
fn test_missing_workspace_config() {
    let ws = TestWorkspace::empty().unwrap();
    ws.write("package.json", "{}");
    nginit(&ws)
        .args(["init", "--skip-install"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No workspace configuration"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_missing_package_json() {
    let ws = TestWorkspace::empty().unwrap();
    ws.write("workspace.json", r#"{"version":2,"projects":{}}"#);
    nginit(&ws)
        .args(["init", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No package.json found"));
    assert!(!ws.read("workspace.json").contains("@nrwl/angular"));
}

#[test]
fn test_invalid_json() {
    let ws = TestWorkspace::nx().unwrap();
    ws.write("package.json", "{ \"name\": ");
    nginit(&ws)
        .args(["init", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON in package.json"));
}

#[test]
fn test_malformed_scripts_writes_nothing() {
    let ws = TestWorkspace::nx().unwrap();
    ws.write("package.json", r#"{"name":"acme","scripts":"nx build"}"#);
    let workspace = ws.read("workspace.json");
    nginit(&ws)
        .args(["init", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected `scripts` to be an object"));
    assert_eq!(ws.read("workspace.json"), workspace);
}

#[test]
fn test_invalid_style_is_usage_error() {
    let ws = TestWorkspace::nx().unwrap();
    nginit(&ws)
        .args(["init", "--style", "sass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_unknown_version_pin_in_config() {
    let ws = TestWorkspace::nx().unwrap();
    nginit_with_config(&ws, "[versions]\nreact = \"17.0.0\"\n")
        .args(["init", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown version pin 'react'"));
}
