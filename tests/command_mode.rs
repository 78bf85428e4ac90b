//! Integration tests for command mode (-c/--command) and exec mode (-e/--exec)

use std::path::PathBuf;
use std::process::Command;

// Tests must not depend on a user's ~/.config/canno/config.toml.
fn empty_config() -> PathBuf {
    let path = std::env::temp_dir().join(format!("canno-test-{}.toml", std::process::id()));
    if !path.exists() {
        std::fs::write(&path, "").expect("Failed to write config");
    }
    path
}

fn run_canno(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_canno"))
        .arg("--config")
        .arg(empty_config())
        .args(args)
        .env("CANNO_LOG", "off")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_canno(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_precedence_and_fractions() {
    let (stdout, _, code) = run_canno(&["-c", "1 + 2 * 3 / 4"]);
    assert_eq!(stdout.trim(), "2.5");
    assert_eq!(code, 0);
}

#[test]
fn test_functions() {
    let (stdout, _, code) = run_canno(&["-c", "MAX(1, 7, 3) + min(4, 2)"]);
    assert_eq!(stdout.trim(), "9");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run_canno(&["-c", "10 + 5"]);
    let (stdout2, _, _) = run_canno(&["-c", "=10 + 5"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_error_exit_code() {
    let (stdout, _, code) = run_canno(&["-c", "NOPE(1)"]);
    assert_eq!(stdout.trim(), "#ERR: Unknown function: NOPE");
    assert_eq!(code, 1);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run_canno(&["-c", "1/0"]);
    assert!(stdout.starts_with("#ERR"));
    assert_eq!(code, 1);
}

#[test]
fn test_parse_error() {
    let (stdout, _, code) = run_canno(&["-c", "(1+2)"]);
    assert!(stdout.starts_with("#ERR"));
    assert_eq!(code, 1);
}

#[test]
fn test_exec_commands_share_a_sheet() {
    let (stdout, _, code) = run_canno(&[
        "-e", "set A1 1",
        "-e", "set B1 =A1+2",
        "-e", "get B1",
        "-e", "set A1 5",
        "-e", "get B1",
    ]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "Set A1 = \"1\"\nSet B1 = \"=A1+2\"\nget B1 = \"3\"\nSet A1 = \"5\"\nget B1 = \"7\"\n"
    );
}

#[test]
fn test_exec_stops_at_quit() {
    let (stdout, _, code) = run_canno(&["-e", "dims", "-e", "quit", "-e", "dims"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "50 x 50\n");
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run_canno(&["--bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unexpected argument: --bogus"));
}

#[test]
fn test_missing_config_warns() {
    let output = Command::new(env!("CARGO_BIN_EXE_canno"))
        .args(["--config", "/nonexistent/canno.toml", "-c", "1"])
        .env("CANNO_LOG", "off")
        .output()
        .expect("Failed to execute command");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1");
    assert!(stderr.contains("Warning: Config file not found"));
}
