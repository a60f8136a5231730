//! End-to-end tests for the `ferrule` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's global plugin list and environment.
fn ferrule(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ferrule");
    cmd.current_dir(dir)
        .env("FERRULE_GLOBAL_CONFIG", dir.join("global.json"))
        .env("FERRULE_GLOBAL_DIR", dir.join("global"))
        .env("NO_COLOR", "1")
        .env_remove("PORT")
        .env_remove("HOST")
        .env_remove("NODE_ENV")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

#[test]
fn help_lists_commands() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn version_flag() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_color_accepts_any_non_empty_value() {
    let dir = workspace(&[]);
    for value in ["1", "yes", "true"] {
        ferrule(dir.path())
            .env("NO_COLOR", value)
            .args(["plugin", "ls"])
            .assert()
            .success()
            .stdout(predicate::str::contains("total: 0"));
    }
    ferrule(dir.path())
        .env("NO_COLOR", "")
        .args(["plugin", "ls", "--json"])
        .assert()
        .success();
}

#[test]
fn no_arguments_is_a_usage_error() {
    let dir = workspace(&[]);
    ferrule(dir.path()).assert().code(2);
}

#[test]
fn plugin_list_starts_empty() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["plugin", "ls", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn plugin_list_reads_global_file() {
    let dir = workspace(&[("global.json", r#"{ "plugins": ["ferrule-plugin-sass"] }"#)]);
    ferrule(dir.path())
        .args(["plugin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ferrule-plugin-sass"))
        .stdout(predicate::str::contains("total: 1"));
}

#[test]
fn adding_an_unknown_plugin_is_not_found() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["plugin", "add", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ghost"));
    assert!(!dir.path().join("global.json").exists());
}

#[test]
fn deleting_a_missing_plugin_warns() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["plugin", "delete", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not a global plugin"));
}

#[test]
fn invalid_project_name_is_rejected() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["create", "app", "react", "--name", "1bad", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("1bad"));
    assert!(!dir.path().join("app").exists());
}

#[test]
fn non_empty_directory_needs_force() {
    let dir = workspace(&[("shop/README.md", "hello")]);
    ferrule(dir.path())
        .args(["create", "shop", "react", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
    assert!(!dir.path().join("shop/package.json").exists());
}

#[test]
fn create_react_project() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["create", "my-shop", "react", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-shop"));

    let manifest = fs::read_to_string(dir.path().join("my-shop/package.json")).unwrap();
    assert!(manifest.contains(r#""name": "my-shop""#));
}

#[test]
fn unknown_create_type_only_warns() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["create", "site", "vue", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not supported"));
}

#[test]
fn create_without_type_lists_available_types() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["create", "site", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("react"));
}

#[test]
fn page_in_a_react_project() {
    let dir = workspace(&[("ferrule.config.json", r#"{ "type": "react" }"#)]);
    ferrule(dir.path())
        .args(["page", "UserProfile"])
        .assert()
        .success();
    assert!(dir.path().join("src/pages/user-profile/index.jsx").is_file());
}

#[test]
fn page_without_project_type_only_warns() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["page", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not support"));
}

#[test]
fn inspect_prints_entries() {
    let dir = workspace(&[("src/pages/home/index.js", "")]);
    ferrule(dir.path())
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entry\""))
        .stdout(predicate::str::contains("\"home\""));
}

#[test]
fn inspect_honours_cwd_flag() {
    let dir = workspace(&[("apps/web/src/pages/about.js", "")]);
    ferrule(dir.path())
        .args(["--cwd", "apps/web", "inspect", "-m", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"about\""))
        .stdout(predicate::str::contains("\"production\""));
}

#[test]
fn invalid_port_is_a_configuration_error() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .env("PORT", "http")
        .arg("inspect")
        .assert()
        .code(4);
}

#[test]
fn settings_failure_is_reported_once() {
    let dir = workspace(&[]);
    let out = ferrule(dir.path())
        .env("FERRULE_GLOBAL_CONFIG", " ")
        .args(["plugin", "ls"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("Failed to load settings").count(), 1);
}

#[cfg(unix)]
#[test]
fn non_utf8_environment_is_ignored() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = workspace(&[("src/pages/home/index.js", "")]);
    ferrule(dir.path())
        .env("UNRELATED_BYTES", OsStr::from_bytes(b"\xff\xfe"))
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"home\""));
}

#[test]
fn missing_config_file_is_not_found() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["--config", "nope.json", "inspect"])
        .assert()
        .code(3);
}

#[test]
fn completions_for_bash() {
    let dir = workspace(&[]);
    ferrule(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ferrule"));
}
