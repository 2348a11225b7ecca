//! Fatal errors that must stop a run before anything is written

mod common;

use common::*;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_unsupported_target_versions() {
    let temp = create_test_project();
    let root = project_root(&temp);

    for version in ["16", "20", "latest"] {
        run_migrate(&root, version, &[])
            .failure()
            .stderr(predicate::str::contains(format!(
                "Unsupported target version '{version}'"
            )));
    }

    assert_eq!(read(&root, "package.json"), MANIFEST);
    assert_eq!(read(&root, "src/index.js"), INDEX_JS);
}

#[test]
fn test_check_rejects_unsupported_target() {
    let temp = create_test_project();
    let root = project_root(&temp);

    run_command(&root, &["check", "15"])
        .failure()
        .stderr(predicate::str::contains("Unsupported target version '15'"));
}

#[test]
fn test_missing_manifest() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("src/index.js"), INDEX_JS).unwrap();

    run_migrate(temp.path(), "18", &[])
        .failure()
        .stderr(predicate::str::contains("package.json not found"));

    assert_eq!(read(temp.path(), "src/index.js"), INDEX_JS);
}

#[test]
fn test_manifest_without_react() {
    let temp = create_test_project();
    let root = project_root(&temp);
    fs::write(
        root.join("package.json"),
        r#"{"name": "cli-tool", "dependencies": {"chalk": "^5.0.0"}}"#,
    )
    .unwrap();

    run_migrate(&root, "18", &[])
        .failure()
        .stderr(predicate::str::contains("React is not listed"));

    assert_eq!(read(&root, "src/index.js"), INDEX_JS);
}

#[test]
fn test_malformed_manifest() {
    let temp = create_test_project();
    let root = project_root(&temp);
    fs::write(root.join("package.json"), "{ \"dependencies\": ").unwrap();

    run_migrate(&root, "18", &[])
        .failure()
        .stderr(predicate::str::contains("Invalid package.json"));

    assert_eq!(read(&root, "src/index.js"), INDEX_JS);
}

#[test]
fn test_invalid_file_filter() {
    let temp = create_test_project();
    let root = project_root(&temp);

    run_migrate(&root, "18", &["--files", "src/("])
        .failure()
        .stderr(predicate::str::contains("Invalid file filter 'src/('"));

    assert_eq!(read(&root, "package.json"), MANIFEST);
}

#[test]
fn test_missing_project_directory() {
    let temp = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("react-migrate");
    cmd.arg("18")
        .arg("does-not-exist")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_conflicting_dependency_flags() {
    let temp = create_test_project();
    let root = project_root(&temp);

    run_migrate(&root, "18", &["--skip-deps", "--deps-only"]).failure();

    assert_eq!(read(&root, "package.json"), MANIFEST);
}
