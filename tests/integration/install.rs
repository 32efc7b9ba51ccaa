//! Package manager invocation, using stub executables on `PATH`

use nginit_cli::test_utils::TestWorkspace;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use super::common::{nginit, nginit_with_config};

/// Writes an executable stub that records its arguments and the legacy
/// peer-deps variable into `install.log` in the working directory.
fn stub_package_manager(dir: &Path, name: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(
        &path,
        "#!/bin/sh\necho \"$0 $* legacy=${npm_config_legacy_peer_deps:-unset}\" > install.log\n",
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn path_with(dir: &Path) -> String {
    match std::env::var("PATH") {
        Ok(path) => format!("{}:{path}", dir.display()),
        Err(_) => dir.display().to_string(),
    }
}

#[test]
fn test_jest_install_uses_legacy_peer_deps() {
    let ws = TestWorkspace::nx().unwrap();
    let bin = ws.path().join(".bin-stub");
    stub_package_manager(&bin, "npm");

    nginit(&ws)
        .env("PATH", path_with(&bin))
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed packages with npm"));

    let log = ws.read("install.log");
    assert!(log.contains("install"), "{log}");
    assert!(log.contains("legacy=true"), "{log}");
    assert!(std::env::var("npm_config_legacy_peer_deps").is_err());
}

#[test]
fn test_yarn_detected_from_lockfile() {
    let ws = TestWorkspace::nx().unwrap();
    ws.write("yarn.lock", "");
    let bin = ws.path().join(".bin-stub");
    stub_package_manager(&bin, "yarn");

    nginit(&ws)
        .env("PATH", path_with(&bin))
        .args(["init", "--unit-test-runner", "karma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed packages with yarn"));

    let log = ws.read("install.log");
    assert!(log.contains("yarn install"), "{log}");
    assert!(log.contains("legacy=unset"), "{log}");
}

#[test]
fn test_missing_package_manager_keeps_written_files() {
    let ws = TestWorkspace::nx().unwrap();
    let empty_bin = ws.path().join(".empty-bin");
    fs::create_dir_all(&empty_bin).unwrap();

    nginit_with_config(&ws, "package_manager = \"pnpm\"\n")
        .env("PATH", &empty_bin)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'pnpm' was not found"));

    assert_eq!(ws.read_json("workspace.json")["cli"]["defaultCollection"], "@nrwl/angular");
}

#[test]
fn test_no_install_when_nothing_changed() {
    let ws = TestWorkspace::nx().unwrap();
    nginit(&ws).args(["init", "--skip-install"]).assert().success();

    let bin = ws.path().join(".bin-stub");
    stub_package_manager(&bin, "npm");
    nginit(&ws).env("PATH", path_with(&bin)).arg("init").assert().success();
    assert!(!ws.path().join("install.log").exists());
}
