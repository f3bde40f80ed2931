use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn running_a_script_file_exits_zero_on_success() {
    let path = std::env::temp_dir().join("rift_cli_ok.rf");
    fs::write(&path, "print(1+2);").unwrap();

    Command::cargo_bin("rift")
        .unwrap()
        .arg(&path)
        .assert()
        .success()
        .stdout("3\n");

    let _ = fs::remove_file(&path);
}

#[test]
fn running_a_script_with_a_runtime_error_exits_nonzero() {
    let path = std::env::temp_dir().join("rift_cli_runtime_error.rf");
    fs::write(&path, "print(1/0);").unwrap();

    Command::cargo_bin("rift").unwrap().arg(&path).assert().failure();

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_file_reports_error_and_exits_nonzero() {
    Command::cargo_bin("rift")
        .unwrap()
        .arg("/no/such/path/does-not-exist.rf")
        .assert()
        .failure()
        .stderr(contains("file not found"));
}

#[test]
fn wrong_argument_count_prints_usage_and_exits_nonzero() {
    Command::cargo_bin("rift")
        .unwrap()
        .arg("one")
        .arg("two")
        .assert()
        .failure()
        .stderr(contains("usage"));
}

#[test]
fn input_builtin_reads_a_line_from_stdin_after_writing_the_prompt() {
    let path = std::env::temp_dir().join("rift_cli_input.rf");
    fs::write(&path, r#"let name = input("name? "); print("hi " + name);"#).unwrap();

    Command::cargo_bin("rift")
        .unwrap()
        .arg(&path)
        .write_stdin("sam\n")
        .assert()
        .success()
        .stdout(contains("name? hi sam"));

    let _ = fs::remove_file(&path);
}
