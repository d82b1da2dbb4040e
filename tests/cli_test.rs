use assert_cmd::Command;
use predicates::prelude::*;

fn mockdir(root: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mockdir").unwrap();
    cmd.env_remove("RUST_LOG").arg("--root").arg(root);
    cmd
}

#[test]
fn test_put_then_get_prints_payload() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("mocks");

    mockdir(&root)
        .args(["put", "login", "u1", "{\"token\":\"abc\"}"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Recorded login@u1"));

    assert!(root.join("u1").join("login_u1.json").is_file());

    mockdir(&root)
        .args(["get", "login", "u1"])
        .assert()
        .success()
        .stdout("{\"token\":\"abc\"}");
}

#[test]
fn test_put_reads_stdin_and_get_falls_back() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("mocks");

    mockdir(&root)
        .args(["put", "login", "u1"])
        .write_stdin("from stdin")
        .assert()
        .success();

    mockdir(&root)
        .args(["get", "login", "u2"])
        .assert()
        .success()
        .stdout("from stdin")
        .stderr(predicate::str::contains("No mock for login@u2"));
}

#[test]
fn test_get_unknown_service_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("mocks");

    mockdir(&root)
        .args(["put", "login", "u1", "x"])
        .assert()
        .success();

    mockdir(&root)
        .args(["get", "billing", "u1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_invalid_key_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    mockdir(temp_dir.path())
        .args(["put", "login", "../escape", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid mock key"));
}

#[test]
fn test_search_and_list() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("mocks");

    for (service, identity) in [("login", "u1"), ("profile", "u1"), ("login", "u2")] {
        mockdir(&root)
            .args(["put", service, identity, "{}"])
            .assert()
            .success();
    }

    mockdir(&root)
        .args(["search", "login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("login_u1.json"))
        .stdout(predicate::str::contains("login_u2.json"))
        .stdout(predicate::str::contains("profile").not());

    mockdir(&root)
        .args(["list", "--json", "--service", "profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"service\": \"profile\""))
        .stdout(predicate::str::contains("\"service\": \"login\"").not());
}

#[test]
fn test_root_from_environment() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("env-mocks");

    let mut cmd = Command::cargo_bin("mockdir").unwrap();
    cmd.env("MOCKDIR_ROOT", &root)
        .args(["put", "login", "u1", "x"])
        .assert()
        .success();

    assert!(root.join("u1").join("login_u1.json").is_file());
}

#[test]
fn test_config_file_in_working_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("mockConfig.properties"),
        "# fixtures\nmockFolderPath=./recorded\nmockFolderMaxEntries=3\nfileExtension=txt\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mockdir").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("MOCKDIR_ROOT")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("mockFolderMaxEntries = 3"))
        .stdout(predicate::str::contains("fileExtension = .txt"));

    let mut cmd = Command::cargo_bin("mockdir").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("MOCKDIR_ROOT")
        .args(["put", "login", "u1", "x"])
        .assert()
        .success();

    assert!(temp_dir
        .path()
        .join("recorded")
        .join("u1")
        .join("login_u1.txt")
        .is_file());
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("mockdir").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("MOCKDIR_ROOT")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mockConfig.properties"));
}

#[test]
fn test_get_json_keeps_binary_payload_intact() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("mocks");

    mockdir(&root)
        .args(["put", "svc", "u1"])
        .write_stdin(vec![0xffu8, 0xfe])
        .assert()
        .success();

    assert_eq!(
        std::fs::read(root.join("u1").join("svc_u1.json")).unwrap(),
        vec![0xff, 0xfe]
    );

    mockdir(&root)
        .args(["get", "svc", "u1"])
        .assert()
        .success()
        .stdout(vec![0xffu8, 0xfe]);

    mockdir(&root)
        .args(["get", "svc", "u1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"encoding\": \"base64\""))
        .stdout(predicate::str::contains("\"payload\": \"//4=\""))
        .stdout(predicate::str::contains("\u{FFFD}").not());
}

#[test]
fn test_get_json_carries_text_payload_as_utf8() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("mocks");

    mockdir(&root)
        .args(["put", "login", "u1", "ok"])
        .assert()
        .success();

    mockdir(&root)
        .args(["get", "login", "u1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"encoding\": \"utf8\""))
        .stdout(predicate::str::contains("\"payload\": \"ok\""));
}

#[test]
fn test_config_file_and_config_name_are_exclusive() {
    let temp_dir = tempfile::tempdir().unwrap();

    mockdir(temp_dir.path())
        .args(["--config", "a.properties", "--config-name", "qa", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
