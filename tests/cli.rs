use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn booksummary(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("booksummary").unwrap();
    cmd.env("BOOKSUMMARY_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_empty_listing() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No summaries yet."));
}

#[test]
fn test_save_list_delete() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .args(["save", "internal", "Dune", "Desert", "planet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Dune.txt (internal)"))
        .stdout(predicate::str::contains("Desert planet"));

    booksummary(temp.path())
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune.txt"));

    booksummary(temp.path())
        .args(["rm", "internal", "Dune.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No summaries yet."));
}

#[test]
fn test_update_of_unknown_name_is_reported_not_fatal() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .args(["update", "internal", "Ghost.txt", "boo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not visible"));
}

#[test]
fn test_legacy_shared_tier_via_api_level_flag() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .args(["--api-level", "29", "save", "shared", "A", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved A.txt (shared)"));

    assert!(temp
        .path()
        .join("public/Download/Book Summary/A.txt")
        .exists());
}

#[test]
fn test_grant_makes_catalog_entries_visible() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .args(["save", "shared", "A", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not visible"));

    let collection = temp.path().join("public/Documents/Book Summary");
    booksummary(temp.path())
        .arg("grant")
        .arg(&collection)
        .assert()
        .success()
        .stdout(predicate::str::contains("Shared directory granted"));

    booksummary(temp.path())
        .arg("watch")
        .assert()
        .success()
        .stdout(predicate::str::contains("A.txt").and(predicate::str::contains("shared")));

    booksummary(temp.path())
        .arg("revoke")
        .assert()
        .success();

    booksummary(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No summaries yet."));
}

#[test]
fn test_grant_rejects_missing_directory() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .args(["grant", "/definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_unknown_tier_is_rejected() {
    let temp = tempfile::tempdir().unwrap();

    booksummary(temp.path())
        .args(["save", "cloud", "A", "b"])
        .assert()
        .failure();
}
