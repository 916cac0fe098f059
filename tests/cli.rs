//! End-to-end tests for the bst binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn style_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn bst() -> Command {
    Command::cargo_bin("bst").unwrap()
}

#[test]
fn test_parse_prints_sexp_by_default() {
    let file = style_file("READ\n");
    bst()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout("(source_file\n  (read))\n");
}

#[test]
fn test_parse_treeviz_with_ranges() {
    let file = style_file("SORT");
    bst()
        .args(["parse", "--format", "treeviz", "--ranges"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("└─ sort [0..4]: SORT\n  └─ keyword [0..4]: SORT\n");
}

#[test]
fn test_parse_json() {
    let file = style_file("SORT");
    let output = bst()
        .args(["parse", "-f", "json"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["nodes"][1]["kind"], "sort");
}

#[test]
fn test_config_file_selects_format() {
    let file = style_file("SORT");
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    config
        .write_all(b"[dump]\nformat = \"yaml\"\n")
        .unwrap();
    bst()
        .arg("--config")
        .arg(config.path())
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nodes:\n- kind: source_file"));
}

#[test]
fn test_tokens() {
    let file = style_file("READ x");
    bst()
        .arg("tokens")
        .arg(file.path())
        .assert()
        .success()
        .stdout("0..4 keyword \"READ\"\n4..5 whitespace \" \"\n5..6 identifier \"x\"\n");
}

#[test]
fn test_tokens_respects_the_size_limit() {
    let file = style_file("READ x");
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    config
        .write_all(b"[parser]\nmax_input_bytes = 2\n")
        .unwrap();
    for command in ["tokens", "parse"] {
        bst()
            .arg("--config")
            .arg(config.path())
            .arg(command)
            .arg(file.path())
            .assert()
            .code(2)
            .stdout("")
            .stderr(predicate::str::contains(
                "input of 6 bytes exceeds the configured limit of 2 bytes",
            ));
    }
}

#[test]
fn test_check_clean_file() {
    let file = style_file("ENTRY { a } { } { }\nREAD\n");
    bst()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with(": no errors\n"));
}

#[test]
fn test_check_reports_positions() {
    let file = style_file("ENTRY { }\nREAD\n@\n");
    bst()
        .arg("check")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(":1:10: missing \"{\""))
        .stdout(predicate::str::contains(":3:1: unrecognized character"));
}

#[test]
fn test_outline() {
    let file = style_file("READ\nFUNCTION {f} { }\nMACRO {jan} {\"January\"}\n");
    bst()
        .arg("outline")
        .arg(file.path())
        .assert()
        .success()
        .stdout("2:11 function f\n3:8 macro jan\n");
}

#[test]
fn test_missing_file_is_an_error() {
    bst()
        .args(["parse", "/nonexistent/style.bst"])
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_invalid_utf8_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'R', 0xff, b'D']).unwrap();
    bst()
        .arg("check")
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn test_subcommand_is_required() {
    bst().assert().failure();
}
