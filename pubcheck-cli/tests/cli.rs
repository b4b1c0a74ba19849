//! CLI behaviour tests against temporary package trees. No repositories are
//! configured, so no network traffic happens.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pubcheck() -> Command {
    Command::cargo_bin("pubcheck").expect("pubcheck binary")
}

fn create_package(manifest: &str) -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    fs::write(td.path().join("manifest.toml"), manifest).expect("write manifest");
    td
}

const GOOD_MANIFEST: &str = r#"
name = "app"
category = "sys-apps"
version = "1.0.0"
description = "An application."

[dependencies]
"stable::zlib" = "*"
"#;

const BAD_DESCRIPTION_MANIFEST: &str = r#"
name = "app"
category = "sys-apps"
version = "1.0.0"
description = "an application"
"#;

#[test]
fn clean_package_passes() {
    let temp = create_package(GOOD_MANIFEST);

    pubcheck()
        .arg("check")
        .arg("--package")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("description"))
        .stdout(predicate::str::contains("pass"));
}

#[test]
fn malformed_description_exits_with_findings() {
    let temp = create_package(BAD_DESCRIPTION_MANIFEST);

    pubcheck()
        .arg("check")
        .arg("--package")
        .arg(temp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn fix_repairs_the_description() {
    let temp = create_package(BAD_DESCRIPTION_MANIFEST);

    pubcheck()
        .arg("check")
        .arg("--package")
        .arg(temp.path())
        .arg("--fix")
        .assert()
        .code(2);

    let manifest = fs::read_to_string(temp.path().join("manifest.toml")).expect("read manifest");
    assert!(manifest.contains("An application."));

    // The repaired package now passes.
    pubcheck()
        .arg("check")
        .arg("--package")
        .arg(temp.path())
        .assert()
        .success();
}

#[test]
fn skip_suppresses_a_failing_check() {
    let temp = create_package(BAD_DESCRIPTION_MANIFEST);

    pubcheck()
        .arg("check")
        .arg("--package")
        .arg(temp.path())
        .arg("--skip")
        .arg("description")
        .assert()
        .success()
        .stdout(predicate::str::contains("description").not());
}

#[test]
fn duplicate_dependencies_are_found_with_a_config() {
    let temp = create_package(
        r#"
name = "app"
category = "sys-apps"
version = "1.0.0"
description = "An application."

[dependencies]
"stable::zlib" = "*"
"unstable::zlib" = "*"
"#,
    );
    fs::write(
        temp.path().join("pubcheck.toml"),
        r#"
[[repositories]]
name = "stable"
url = "https://stable.example.org"

[[repositories]]
name = "unstable"
url = "https://unstable.example.org"
"#,
    )
    .expect("write config");

    pubcheck()
        .arg("check")
        .arg("--package")
        .arg(temp.path())
        .arg("--fix")
        .assert()
        .code(2);

    let manifest = fs::read_to_string(temp.path().join("manifest.toml")).expect("read manifest");
    assert!(manifest.contains("stable::zlib"));
    assert!(!manifest.contains("unstable::zlib"));
}

#[test]
fn missing_package_is_a_tool_error() {
    pubcheck()
        .arg("check")
        .arg("--package")
        .arg("/nonexistent/package")
        .assert()
        .code(1);
}

#[test]
fn list_checks_names_every_check() {
    pubcheck()
        .arg("list-checks")
        .assert()
        .success()
        .stdout(predicate::str::contains("executable"))
        .stdout(predicate::str::contains("native-dependencies"))
        .stdout(predicate::str::contains("duplicate-dependencies"))
        .stdout(predicate::str::contains("duplicate-files"));
}
