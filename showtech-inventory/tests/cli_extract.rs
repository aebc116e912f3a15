use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("showtech-inventory"))
}

#[test]
fn extract_text_renders_every_category() {
    cmd()
        .arg("extract")
        .arg(fixture("fixtures/ios-showtech.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("edge-sw1 (IOS, hint Cisco IOS)"))
        .stdout(predicate::str::contains("Interfaces (6)"))
        .stdout(predicate::str::contains("Access Lists (6)"))
        .stdout(predicate::str::contains("Trunks (2)"))
        .stdout(predicate::str::contains("CDP (1)"))
        .stdout(predicate::str::contains("10.0.0.1/24"));
}

#[test]
fn extract_json_keeps_category_and_field_order() {
    let output = cmd()
        .arg("extract")
        .arg(fixture("fixtures/nxos-showtech.txt"))
        .arg("--format")
        .arg("json")
        .output()
        .expect("run extract");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["hostname"], "nx-core1");
    assert_eq!(json["family"], "NXOS");
    assert_eq!(json["hint"], "Cisco NXOS");

    let text = String::from_utf8_lossy(&output.stdout);
    let positions: Vec<usize> = ["\"Interfaces\"", "\"Access Lists\"", "\"Trunks\"", "\"CDP\""]
        .iter()
        .map(|key| text.find(key).expect("category key present"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let first = &json["categories"]["Interfaces"][0];
    assert_eq!(first["interface"], "Ethernet1/1");
}

#[test]
fn extract_category_filter() {
    cmd()
        .arg("extract")
        .arg(fixture("fixtures/ios-showtech.txt"))
        .arg("--category")
        .arg("acls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Access Lists (6)"))
        .stdout(predicate::str::contains("Interfaces").not());
}

#[test]
fn extract_writes_one_json_file_per_hostname() {
    let dir = tempdir().expect("temp dir");
    let out = dir.path().join("reports");

    cmd()
        .arg("extract")
        .arg(fixture("fixtures/ios-showtech.txt"))
        .arg(fixture("fixtures/nxos-showtech.txt"))
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("edge-sw1.json"))
        .stdout(predicate::str::contains("nx-core1.json"));

    let ios = fs::read_to_string(out.join("edge-sw1.json")).expect("ios report");
    let json: serde_json::Value = serde_json::from_str(&ios).expect("valid JSON");
    assert_eq!(json["categories"]["CDP"][0]["remote_hostname"], "core-sw1.example.com");
    assert!(out.join("nx-core1.json").exists());
}

#[test]
fn extract_hint_override_is_reported() {
    cmd()
        .arg("extract")
        .arg(fixture("fixtures/ios-showtech.txt"))
        .arg("--hint")
        .arg("asa")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hint\": \"Cisco ASA\""))
        .stderr(predicate::str::contains("disagrees with detected family IOS"));
}

#[test]
fn extract_rejects_unknown_hint() {
    cmd()
        .arg("extract")
        .arg(fixture("fixtures/ios-showtech.txt"))
        .arg("--hint")
        .arg("juniper")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown device hint 'juniper'"));
}

#[test]
fn extract_falls_back_to_embedded_layouts() {
    let dir = tempdir().expect("temp dir");
    let layouts = dir.path().join("columns.toml");
    fs::write(&layouts, "[[ethernet]]\nfield = ").expect("write layouts");

    cmd()
        .arg("extract")
        .arg(fixture("fixtures/nxos-showtech.txt"))
        .arg("--layouts")
        .arg(&layouts)
        .assert()
        .success()
        .stderr(predicate::str::contains("using embedded layouts"))
        .stdout(predicate::str::contains("Interfaces (6)"));
}

#[test]
fn extract_enforces_size_limit() {
    cmd()
        .arg("extract")
        .arg(fixture("fixtures/ios-showtech.txt"))
        .arg("--max-bytes")
        .arg("100")
        .assert()
        .failure()
        .stderr(predicate::str::contains("above the 100 byte limit"));
}

#[test]
fn extract_reports_failures_but_keeps_other_files() {
    let dir = tempdir().expect("temp dir");
    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "nothing useful here\n").expect("write capture");

    cmd()
        .arg("extract")
        .arg(&empty)
        .arg(fixture("fixtures/ios-showtech.txt"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("edge-sw1"))
        .stderr(predicate::str::contains("no show-command headers found"))
        .stderr(predicate::str::contains("1 of 2 captures failed"));
}
