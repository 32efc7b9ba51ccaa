//! End-to-end `nginit init` runs

use nginit_cli::test_utils::TestWorkspace;
use predicates::prelude::*;

use super::common::nginit;

#[test]
fn test_init_defaults() {
    let ws = TestWorkspace::nx().unwrap();
    nginit(&ws)
        .args(["init", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Angular support"))
        .stdout(predicate::str::contains("CREATE jest.config.js"));

    let workspace = ws.read_json("workspace.json");
    assert_eq!(workspace["cli"]["defaultCollection"], "@nrwl/angular");
    let app = &workspace["generators"]["@nrwl/angular:application"];
    assert_eq!(app["style"], "css");
    assert_eq!(app["linter"], "eslint");
    assert_eq!(app["unitTestRunner"], "jest");
    assert_eq!(app["e2eTestRunner"], "cypress");

    let package = ws.read_json("package.json");
    assert_eq!(
        package["scripts"]["postinstall"],
        "ngcc --properties es2015 browser module main"
    );
    assert!(package["dependencies"]["zone.js"].is_string());
    assert!(package["devDependencies"]["jest-preset-angular"].is_string());
    assert!(package["devDependencies"]["@nrwl/cypress"].is_string());
    assert!(ws.read("package.json").ends_with("}\n"));
}

#[test]
fn test_init_scss_karma_protractor() {
    let ws = TestWorkspace::nx().unwrap();
    nginit(&ws)
        .args([
            "init",
            "--style",
            "scss",
            "--unit-test-runner",
            "karma",
            "--e2e-test-runner",
            "protractor",
            "--skip-install",
        ])
        .assert()
        .success();

    let workspace = ws.read_json("workspace.json");
    assert_eq!(workspace["generators"]["@nrwl/angular:component"]["style"], "scss");
    assert_eq!(workspace["generators"]["@nrwl/angular:library"]["unitTestRunner"], "karma");

    let package = ws.read_json("package.json");
    let dev = package["devDependencies"].as_object().unwrap();
    assert!(dev.contains_key("karma"));
    assert!(dev.contains_key("protractor"));
    assert!(dev.contains_key("@types/jasminewd2"));
    assert!(!dev.contains_key("jest-preset-angular"));
    assert!(!dev.contains_key("@nrwl/cypress"));
    assert!(ws.path().join("karma.conf.js").exists());
    assert!(!ws.path().join("jest.config.js").exists());
}

#[test]
fn test_init_is_idempotent() {
    let ws = TestWorkspace::nx().unwrap();
    nginit(&ws).args(["init", "--skip-install"]).assert().success();
    let package = ws.read("package.json");
    let workspace = ws.read("workspace.json");

    nginit(&ws)
        .args(["init", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already supports Angular"));
    assert_eq!(ws.read("package.json"), package);
    assert_eq!(ws.read("workspace.json"), workspace);
}

#[test]
fn test_existing_generator_options_survive() {
    let ws = TestWorkspace::nx().unwrap();
    ws.write(
        "workspace.json",
        r#"{
  "version": 2,
  "projects": {},
  "generators": {
    "@nrwl/angular:application": { "style": "less", "routing": true }
  }
}
"#,
    );
    nginit(&ws).args(["init", "--style", "scss", "--skip-install"]).assert().success();

    let workspace = ws.read_json("workspace.json");
    let app = &workspace["generators"]["@nrwl/angular:application"];
    assert_eq!(app["style"], "less");
    assert_eq!(app["routing"], true);
    assert_eq!(workspace["generators"]["@nrwl/angular:library"]["style"], "scss");
}

#[test]
fn test_dry_run_leaves_disk_untouched() {
    let ws = TestWorkspace::nx().unwrap();
    let package = ws.read("package.json");
    let workspace = ws.read("workspace.json");

    nginit(&ws)
        .args(["init", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Planned changes"))
        .stdout(predicate::str::contains("run jest generator"))
        .stdout(predicate::str::contains("Dependencies: 15 packages"))
        .stdout(predicate::str::contains("Dry run"));

    assert_eq!(ws.read("package.json"), package);
    assert_eq!(ws.read("workspace.json"), workspace);
    assert!(!ws.path().join("jest.config.js").exists());
}

#[test]
fn test_skip_package_json() {
    let ws = TestWorkspace::nx().unwrap();
    let package = ws.read("package.json");
    nginit(&ws)
        .args([
            "init",
            "--skip-package-json",
            "--unit-test-runner",
            "none",
            "--e2e-test-runner",
            "none",
            "--skip-install",
        ])
        .assert()
        .success();
    assert_eq!(ws.read("package.json"), package);
    assert_eq!(ws.read_json("workspace.json")["cli"]["defaultCollection"], "@nrwl/angular");
}

#[test]
fn test_unknown_runner_warns_and_adds_nothing() {
    let ws = TestWorkspace::nx().unwrap();
    nginit(&ws)
        .args(["init", "--unit-test-runner", "mocha", "--e2e-test-runner", "none", "--skip-install"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unrecognized unit test runner"));

    let package = ws.read_json("package.json");
    assert!(package["devDependencies"].get("jest-preset-angular").is_none());
    assert!(package["devDependencies"].get("karma").is_none());
    let app = &ws.read_json("workspace.json")["generators"]["@nrwl/angular:application"];
    assert_eq!(app["unitTestRunner"], "none");
}

#[test]
fn test_path_flag() {
    let ws = TestWorkspace::empty().unwrap();
    ws.write("apps/ws/package.json", r#"{"name":"nested"}"#);
    ws.write("apps/ws/angular.json", r#"{"version":1,"projects":{}}"#);

    nginit(&ws)
        .args(["init", "--path", "apps/ws", "--skip-install", "--e2e-test-runner", "none"])
        .assert()
        .success();
    let angular = ws.read_json("apps/ws/angular.json");
    assert_eq!(angular["cli"]["defaultCollection"], "@nrwl/angular");
    assert!(!ws.path().join("workspace.json").exists());
}
