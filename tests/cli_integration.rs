// CLI integration tests for the add/export flows.
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_dialogite");
    let mut cmd = Command::new(exe);
    // Keep stderr to the single JSON error line the assertions expect.
    cmd.env_remove("RUST_LOG");
    cmd
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn store_path(dir: &Path) -> std::path::PathBuf {
    dir.join("dialogue_data.json")
}

fn export_path(dir: &Path) -> std::path::PathBuf {
    dir.join("dialogue_data.txt")
}

#[test]
fn add_then_export_round_trip() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();

    let add = cmd()
        .args([
            "--dir",
            dir.to_str().unwrap(),
            "add",
            "--json",
            "translate|hello|你好\ngreet||hello there",
        ])
        .output()
        .expect("add");
    assert!(add.status.success());
    let add_json = parse_json(std::str::from_utf8(&add.stdout).expect("utf8"));
    assert_eq!(add_json["parsed"], 2);
    assert_eq!(add_json["added"], 2);
    assert_eq!(add_json["duplicates"], 0);
    assert_eq!(add_json["total"], 2);
    assert!(
        add_json["store_path"]
            .as_str()
            .unwrap()
            .ends_with("dialogue_data.json")
    );

    let store_text = std::fs::read_to_string(store_path(dir)).expect("store");
    assert!(store_text.contains("你好"));
    assert!(
        store_text.find("\"instruction\"").unwrap() < store_text.find("\"input\"").unwrap()
    );

    let export = cmd()
        .args(["--dir", dir.to_str().unwrap(), "export", "--json"])
        .output()
        .expect("export");
    assert!(export.status.success());
    let export_json = parse_json(std::str::from_utf8(&export.stdout).expect("utf8"));
    assert_eq!(export_json["lines"], 2);

    let text = std::fs::read_to_string(export_path(dir)).expect("export file");
    assert_eq!(text, "translate|hello||你好\ngreet||hello there");
}

#[test]
fn re_adding_equivalent_line_is_deduplicated() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();

    let first = cmd()
        .args(["--dir", dir.to_str().unwrap(), "add", "--json", "A||B"])
        .output()
        .expect("add");
    assert!(first.status.success());

    let second = cmd()
        .args(["--dir", dir.to_str().unwrap(), "add", "--json", "A||B"])
        .output()
        .expect("add again");
    assert!(second.status.success());
    let second_json = parse_json(std::str::from_utf8(&second.stdout).expect("utf8"));
    assert_eq!(second_json["added"], 0);
    assert_eq!(second_json["duplicates"], 1);
    assert_eq!(second_json["total"], 1);
}

#[test]
fn duplicates_within_one_batch_are_both_kept() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();

    let add = cmd()
        .args([
            "--dir",
            dir.to_str().unwrap(),
            "add",
            "--json",
            "Q|C|R\nQ|C||R",
        ])
        .output()
        .expect("add");
    assert!(add.status.success());
    let add_json = parse_json(std::str::from_utf8(&add.stdout).expect("utf8"));
    assert_eq!(add_json["added"], 2);
    assert_eq!(add_json["total"], 2);
}

#[test]
fn malformed_line_aborts_without_touching_the_store() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();

    let add = cmd()
        .args([
            "--dir",
            dir.to_str().unwrap(),
            "add",
            "--json",
            "good|line|here\nonly|two",
        ])
        .output()
        .expect("add");
    assert_eq!(add.status.code().unwrap(), 2);
    let err_json = parse_json(std::str::from_utf8(&add.stderr).expect("utf8"));
    let inner = &err_json["error"];
    assert_eq!(inner["kind"], "Usage");
    assert_eq!(inner["line"], 2);
    let message = inner["message"].as_str().unwrap();
    assert!(message.contains('3'));
    assert!(message.contains('2'));
    assert!(!store_path(dir).exists());
}

#[test]
fn malformed_store_is_recovered_on_add() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    std::fs::write(store_path(dir), "{definitely not json").expect("write");

    let add = cmd()
        .args(["--dir", dir.to_str().unwrap(), "add", "--json", "a|b|c"])
        .output()
        .expect("add");
    assert!(add.status.success());
    let add_json = parse_json(std::str::from_utf8(&add.stdout).expect("utf8"));
    assert_eq!(add_json["total"], 1);
}

#[test]
fn export_without_store_exits_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();

    let export = cmd()
        .args(["--dir", dir.to_str().unwrap(), "export"])
        .output()
        .expect("export");
    assert_eq!(export.status.code().unwrap(), 3);
    let err_json = parse_json(std::str::from_utf8(&export.stderr).expect("utf8"));
    assert_eq!(err_json["error"]["kind"], "NotFound");
}

#[test]
fn export_of_malformed_store_exits_corrupt() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    std::fs::write(store_path(dir), "[{]").expect("write");

    let export = cmd()
        .args(["--dir", dir.to_str().unwrap(), "export"])
        .output()
        .expect("export");
    assert_eq!(export.status.code().unwrap(), 5);
    let err_json = parse_json(std::str::from_utf8(&export.stderr).expect("utf8"));
    assert_eq!(err_json["error"]["kind"], "Corrupt");
}

#[test]
fn invalid_record_aborts_export_and_writes_no_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    std::fs::write(
        store_path(dir),
        "[{\"instruction\":\"ok\",\"input\":\"\",\"output\":\"x\"},{\"instruction\":\"bad\",\"input\":\"\"}]",
    )
    .expect("write");

    let export = cmd()
        .args(["--dir", dir.to_str().unwrap(), "export"])
        .output()
        .expect("export");
    assert_eq!(export.status.code().unwrap(), 5);
    let err_json = parse_json(std::str::from_utf8(&export.stderr).expect("utf8"));
    let inner = &err_json["error"];
    assert_eq!(inner["record_index"], 2);
    assert_eq!(inner["record"]["instruction"], "bad");
    assert!(!export_path(dir).exists());
}

#[test]
fn empty_input_is_a_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();

    let add = cmd()
        .args(["--dir", dir.to_str().unwrap(), "add", "--json", "   \n  "])
        .output()
        .expect("add");
    assert_eq!(add.status.code().unwrap(), 2);
    let err_json = parse_json(std::str::from_utf8(&add.stderr).expect("utf8"));
    assert_eq!(err_json["error"]["kind"], "Usage");
    assert!(!store_path(dir).exists());
}

#[test]
fn add_reads_lines_from_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path();
    let input_path = dir.join("lines.txt");
    std::fs::write(&input_path, "ask|ctx|answer\n").expect("write");

    let add = cmd()
        .args([
            "--dir",
            dir.to_str().unwrap(),
            "add",
            "--json",
            "-f",
            input_path.to_str().unwrap(),
        ])
        .output()
        .expect("add");
    assert!(add.status.success());
    let add_json = parse_json(std::str::from_utf8(&add.stdout).expect("utf8"));
    assert_eq!(add_json["added"], 1);
}

#[test]
fn version_emits_json() {
    let version = cmd().arg("version").output().expect("version");
    assert!(version.status.success());
    let value = parse_json(std::str::from_utf8(&version.stdout).expect("utf8"));
    assert_eq!(value["name"], "dialogite");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}
