//! CLI end-to-end tests that invoke the compiled `colette` binary.

use assert_cmd::Command;
use colette_test_utils::TestProject;
use predicates::prelude::*;

/// Get a Command for the colette binary
fn colette() -> Command {
    Command::new(env!("CARGO_BIN_EXE_colette"))
}

fn novel() -> TestProject {
    let project = TestProject::new();
    project
        .file("01-intro.md", "Intro.\n")
        .file("02-middle.txt", "Middle.\n")
        .file("03-part/scene.md", "Scene.\n");
    project
}

// ============================================================================
// Help and usage
// ============================================================================

#[test]
fn help_lists_commands() {
    colette()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("collate"))
        .stdout(predicate::str::contains("check-pandoc"));
}

#[test]
fn no_command_prints_hint() {
    colette()
        .assert()
        .success()
        .stdout(predicate::str::contains("colette --help"));
}

#[test]
fn completions_are_generated() {
    colette()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("colette"));
}

// ============================================================================
// init
// ============================================================================

#[test]
fn init_creates_manifests() {
    let project = novel();

    colette()
        .arg("init")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 directories scanned, 4 entries added"));

    assert_eq!(
        project.read_manifest(""),
        "01-intro.md\n02-middle.txt\n03-part\n"
    );
    assert_eq!(project.read_manifest("03-part"), "scene.md\n");
}

#[test]
fn init_defaults_to_current_directory() {
    let project = novel();

    colette()
        .arg("init")
        .current_dir(project.root())
        .assert()
        .success();

    project.assert_file_exists(".index");
}

#[test]
fn init_reports_failed_directories() {
    let project = novel();
    project.file_bytes("03-part/.index", b"\xff\n");

    colette()
        .arg("init")
        .arg(project.root())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid .index file format"))
        .stderr(predicate::str::contains("1 of 2 directories could not be updated"));

    project.assert_file_exists(".index");
}

#[test]
fn missing_directory_is_an_error() {
    let project = TestProject::new();

    colette()
        .arg("check")
        .arg(project.path("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot access project directory"));
}

// ============================================================================
// check / collate / list
// ============================================================================

#[test]
fn check_after_init_succeeds() {
    let project = novel();
    colette().arg("init").arg(project.root()).assert().success();

    colette()
        .arg("check")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files checked"));
}

#[test]
fn check_without_manifest_fails_with_diagnostic() {
    let project = novel();

    colette()
        .arg("check")
        .arg(project.root())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error initializing file iterator"))
        .stderr(predicate::str::contains("Required .index file not found"));
}

#[test]
fn check_reports_missing_entry() {
    let project = novel();
    project.manifest("", &["01-intro.md", "ghost"]);

    colette()
        .arg("check")
        .arg(project.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error getting next file for"))
        .stderr(predicate::str::contains("ghost: File not found"));
}

#[test]
fn collate_writes_titled_document() {
    let project = novel();
    colette().arg("init").arg(project.root()).assert().success();

    colette()
        .args(["collate", "--title", "First Draft"])
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Collated 3 files"));

    assert_eq!(
        project.read("_First_Draft_.md"),
        "Intro.\n\nMiddle.\n\nScene.\n\n"
    );
}

#[test]
fn collate_uses_settings_file() {
    let project = novel();
    project.file(".colette.toml", "title = \"Book\"\n");
    colette().arg("init").arg(project.root()).assert().success();

    colette().arg("collate").arg(project.root()).assert().success();

    project.assert_file_exists("_Book_.md");
}

#[test]
fn invalid_settings_file_is_reported() {
    let project = novel();
    project.file(".colette.toml", "colour = \"red\"\n");
    project.manifest("", &[]);

    colette()
        .arg("check")
        .arg(project.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse settings"));
}

#[test]
fn extension_flag_changes_resolution() {
    let project = TestProject::new();
    project
        .manifest("", &["note"])
        .file("note.md", "markdown\n")
        .file("note.txt", "text\n");

    colette()
        .args(["collate", "-e", ".txt"])
        .arg(project.root())
        .assert()
        .success();

    assert_eq!(project.read("_draft_.md"), "text\n\n");
}

#[test]
fn max_depth_flag_is_enforced() {
    let project = TestProject::new();
    project
        .manifest("", &["a"])
        .manifest("a", &["b"])
        .manifest("a/b", &[]);

    colette()
        .args(["check", "--max-depth", "2"])
        .arg(project.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project hierarchy exceeds maximum depth"));
}

#[test]
fn invalid_padding_is_rejected_by_parser() {
    colette()
        .args(["list", "--padding", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid padding"));
}

#[cfg(unix)]
#[test]
fn list_creates_numbered_links() {
    let project = novel();
    colette().arg("init").arg(project.root()).assert().success();

    colette()
        .args(["list", "--padding", "2"])
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Listed 3 files"));

    assert_eq!(
        project.list_dir("_draft_"),
        vec!["01_01-intro.md", "02_02-middle.txt", "03_scene.md"]
    );
}
